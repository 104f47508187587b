//! Unbuffered line reading.
//!
//! The response reader parses the head line by line and then reads the body
//! as raw bytes from the same stream, so a line must be read one byte at a
//! time: anything read past the terminator would be lost to the body.

use alloc::string::String;
use alloc::vec::Vec;

use super::error::{Error, Stage};
use crate::network::Read;

fn next_byte<R: Read + ?Sized>(reader: &mut R) -> Result<Option<u8>, Error> {
    let mut byte = [0u8; 1];
    match reader.read(&mut byte) {
        Ok(0) => Ok(None),
        Ok(_) => Ok(Some(byte[0])),
        Err(e) => Err(Error::transport(Stage::Read, &e)),
    }
}

/// Read one line terminated by `"\r\n"` or `"\n"` and return it without the
/// terminator.
///
/// A `'\r'` that is not followed by `'\n'` is ordinary content. End of stream
/// ends the line, so an exhausted stream yields an empty string. Invalid UTF-8
/// is replaced rather than rejected.
pub fn read_line<R: Read + ?Sized>(reader: &mut R) -> Result<String, Error> {
    let mut line = Vec::new();
    let mut pending_cr = false;

    while let Some(byte) = next_byte(reader)? {
        match byte {
            b'\n' => {
                pending_cr = false;
                break;
            }
            b'\r' => {
                if pending_cr {
                    line.push(b'\r');
                }
                pending_cr = true;
            }
            other => {
                if pending_cr {
                    line.push(b'\r');
                    pending_cr = false;
                }
                line.push(other);
            }
        }
    }
    if pending_cr {
        line.push(b'\r');
    }

    Ok(String::from_utf8_lossy(&line).into_owned())
}
