use bytes::{Buf, BytesMut};
use std::io::Cursor;
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::{self, Request, Response, HEADER_SIZE, MAX_BODY_SIZE};
use crate::Error;

pub struct MemcacheCodec;

impl Decoder for MemcacheCodec {
    type Item = Request;
    type Error = Error;

    // Requests are length-prefixed, so there is no need to parse
    // speculatively: the header names the total body length up front, and
    // parsing only starts once that many bytes are buffered.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_SIZE {
            src.reserve(HEADER_SIZE - src.len());
            return Ok(None);
        }

        let mut length_bytes = &src[8..12];
        let body_len = length_bytes.get_u32() as usize;

        // Refuse absurd lengths before buffering anything for them.
        if body_len > MAX_BODY_SIZE {
            return Err(frame::Error::BodyTooLarge(body_len).into());
        }

        let frame_len = HEADER_SIZE + body_len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let bytes = src.split_to(frame_len);
        let request = Request::parse(&mut Cursor::new(&bytes[..]))?;

        Ok(Some(request))
    }
}

impl Encoder<Response> for MemcacheCodec {
    type Error = Error;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        response.write(dst);
        Ok(())
    }
}
