// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TreeCocoError {
    InvalidInputPath(String),
    MissingDirectory(String),
    BufferSizeError,
    ImageReadError(String),
    ImageWriteError(String),
    ImageExtensionError,
    ParseError(String),
    EmptyFrameError(String),
    CocoReadError,
    CocoWriteError,
    ConfigError(String),
    FileError(String),
    DirError(String),
    WorkerError(String),
}

impl fmt::Display for TreeCocoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreeCocoError::InvalidInputPath(message) => {
                write!(
                    f,
                    "[treecoco::InvalidInputPath] Input path is not valid. {}.",
                    message
                )
            }
            TreeCocoError::MissingDirectory(name) => {
                write!(
                    f,
                    "[treecoco::MissingDirectory] Required directory {} could not be found in dataset root.",
                    name
                )
            }
            TreeCocoError::BufferSizeError => {
                write!(
                    f,
                    "[treecoco::BufferSizeError] The buffer does not match provided size."
                )
            }
            TreeCocoError::ImageReadError(path) => {
                write!(f, "[treecoco::ImageReadError] Failed to read image {}.", path)
            }
            TreeCocoError::ImageWriteError(path) => {
                write!(
                    f,
                    "[treecoco::ImageWriteError] Failed to write image {}.",
                    path
                )
            }
            TreeCocoError::ImageExtensionError => {
                write!(
                    f,
                    "[treecoco::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            TreeCocoError::ParseError(message) => {
                write!(
                    f,
                    "[treecoco::ParseError] File name does not follow the dataset naming scheme. {}.",
                    message
                )
            }
            TreeCocoError::EmptyFrameError(key) => {
                write!(
                    f,
                    "[treecoco::EmptyFrameError] No single tree masks were found for frame {}.",
                    key
                )
            }
            TreeCocoError::CocoReadError => {
                write!(f, "[treecoco::CocoReadError] COCO document could not be read.")
            }
            TreeCocoError::CocoWriteError => {
                write!(
                    f,
                    "[treecoco::CocoWriteError] Failed to successfully write COCO document to output."
                )
            }
            TreeCocoError::ConfigError(message) => {
                write!(
                    f,
                    "[treecoco::ConfigError] Configuration is invalid. {}.",
                    message
                )
            }
            TreeCocoError::FileError(message) => {
                write!(
                    f,
                    "[treecoco::FileError] File could not be accessed. {}.",
                    message
                )
            }
            TreeCocoError::DirError(message) => {
                write!(
                    f,
                    "[treecoco::DirError] Directory could not be read. {}.",
                    message
                )
            }
            TreeCocoError::WorkerError(message) => {
                write!(
                    f,
                    "[treecoco::WorkerError] Background pipeline stopped unexpectedly. {}.",
                    message
                )
            }
        }
    }
}

impl std::error::Error for TreeCocoError {}
