use mockito::{Mock, ServerGuard};

/// Nothing listens on port 1, so connecting is refused at once
#[allow(dead_code)]
pub const CLOSED_URL: &str = "http://127.0.0.1:1";

/// Mock `GET path` answering `status` with a body of the given content type
pub fn mock_get(
    server: &mut ServerGuard,
    path: &str,
    status: usize,
    content_type: &str,
    body: &str,
) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .with_header("content-type", content_type)
        .with_body(body)
        .create()
}
