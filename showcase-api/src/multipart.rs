//! Minimal `multipart/form-data` encoder for showcase image uploads.

use std::io::{self, Read};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) struct MultipartBody {
    boundary: String,
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub(crate) fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self {
            boundary: format!("----showcase-sync-{nanos:032x}"),
            bytes: Vec::new(),
        }
    }

    pub(crate) fn text(&mut self, name: &str, value: &str) {
        self.open_part(&format!("Content-Disposition: form-data; name=\"{name}\"\r\n"));
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.extend_from_slice(b"\r\n");
    }

    pub(crate) fn file(
        &mut self,
        name: &str,
        file_name: &str,
        reader: &mut impl Read,
    ) -> io::Result<()> {
        self.open_part(&format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n",
            file_name.replace('"', "%22")
        ));
        reader.read_to_end(&mut self.bytes)?;
        self.bytes.extend_from_slice(b"\r\n");
        Ok(())
    }

    /// Close the body; returns the `Content-Type` header value and the bytes.
    pub(crate) fn finish(mut self) -> (String, Vec<u8>) {
        self.bytes
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.bytes,
        )
    }

    fn open_part(&mut self, headers: &str) {
        self.bytes
            .extend_from_slice(format!("--{}\r\n{headers}\r\n", self.boundary).as_bytes());
    }
}
