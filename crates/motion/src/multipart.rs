//! `multipart/x-mixed-replace` framing for MJPEG over HTTP.

use bytes::{BufMut, Bytes, BytesMut};

pub const BOUNDARY: &str = "frame";

pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

const PART_HEADER: &[u8] = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n";

/// One complete part: boundary, header, payload and trailing CRLF.
pub fn jpeg_part(jpeg: &[u8]) -> Bytes {
    let mut part = BytesMut::with_capacity(PART_HEADER.len() + jpeg.len() + 2);
    part.put_slice(PART_HEADER);
    part.put_slice(jpeg);
    part.put_slice(b"\r\n");
    part.freeze()
}
