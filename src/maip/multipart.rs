// multipart/form-data encoder for the submit endpoint
use uuid::Uuid;

const CRLF: &str = "\r\n";

/// Builds a multipart/form-data request body. ureq has no multipart
/// support, and the submit endpoint accepts nothing else, so the wire
/// format is assembled here: text parts for the flags, one file part
/// for the uploaded CSV.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: format!("maip-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(&mut self, name: &str, value: &str) {
        self.part_header(name, None);
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(CRLF.as_bytes());
    }

    pub fn file(&mut self, name: &str, filename: &str, content_type: &str, content: &[u8]) {
        self.part_header(name, Some((filename, content_type)));
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(CRLF.as_bytes());
    }

    /// Returns the Content-Type header value and the finished body.
    pub fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--{}", self.boundary, CRLF).as_bytes());
        let content_type = format!("multipart/form-data; boundary={}", self.boundary);
        (content_type, self.body)
    }

    fn part_header(&mut self, name: &str, file: Option<(&str, &str)>) {
        let mut header = format!(
            "--{}{}Content-Disposition: form-data; name=\"{}\"",
            self.boundary,
            CRLF,
            escape_quotes(name)
        );
        if let Some((filename, content_type)) = file {
            header.push_str(&format!(
                "; filename=\"{}\"{}Content-Type: {}",
                escape_quotes(filename),
                CRLF,
                content_type
            ));
        }
        header.push_str(CRLF);
        header.push_str(CRLF);
        self.body.extend_from_slice(header.as_bytes());
    }
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}
