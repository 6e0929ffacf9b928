// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// Failed to parse an SVG path data string.
    InvalidPathData,

    /// An image has a format the library cannot handle.
    UnsupportedImageFormat,

    /// Failed to decode an image.
    ImageDecodingFailed,

    /// Failed to encode an image.
    ImageEncodingFailed,

    /// Failed to parse a font face.
    FaceParsingFailed,

    /// An I/O error.
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::InvalidPathData => {
                write!(f, "provided path data is malformed")
            }
            Error::UnsupportedImageFormat => {
                write!(f, "provided image has an unsupported format")
            }
            Error::ImageDecodingFailed => {
                write!(f, "failed to decode the provided image")
            }
            Error::ImageEncodingFailed => {
                write!(f, "failed to encode the image")
            }
            Error::FaceParsingFailed => {
                write!(f, "failed to parse the provided font face")
            }
            Error::Io(ref e) => {
                write!(f, "an I/O error occurred cause {}", e)
            }
        }
    }
}

impl std::error::Error for Error {}
