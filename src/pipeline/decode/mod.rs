pub mod decoder;
pub mod encoding;

pub use decoder::MaskDecoder;
pub use encoding::{Channel, ChannelEncoding, ClassEncoding, EncodingKind, LumaEncoding};
