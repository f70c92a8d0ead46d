use image::Rgba;
use serde::Deserialize;

/// Strategy mapping a decoded pixel to its raw class value.
pub trait ClassEncoding: Send + Sync {
    fn class_value(&self, pixel: &Rgba<u8>) -> u32;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
            Channel::Alpha => 3,
        }
    }
}

/// Reads the class label straight out of one RGBA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelEncoding {
    channel: Channel,
}

impl ChannelEncoding {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    pub fn red() -> Self {
        Self::new(Channel::Red)
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

impl Default for ChannelEncoding {
    fn default() -> Self {
        Self::red()
    }
}

impl ClassEncoding for ChannelEncoding {
    fn class_value(&self, pixel: &Rgba<u8>) -> u32 {
        pixel[self.channel.index()] as u32
    }

    fn name(&self) -> &'static str {
        match self.channel {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
            Channel::Alpha => "alpha",
        }
    }
}

/// For grayscale masks saved as RGB: Rec. 601 luma, rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LumaEncoding;

impl ClassEncoding for LumaEncoding {
    fn class_value(&self, pixel: &Rgba<u8>) -> u32 {
        let luma = 0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
        luma.round() as u32
    }

    fn name(&self) -> &'static str {
        "luma"
    }
}

/// Encoding selector as it appears in settings files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingKind {
    #[default]
    Red,
    Green,
    Blue,
    Alpha,
    Luma,
}

impl EncodingKind {
    pub fn build(self) -> Box<dyn ClassEncoding> {
        match self {
            EncodingKind::Red => Box::new(ChannelEncoding::new(Channel::Red)),
            EncodingKind::Green => Box::new(ChannelEncoding::new(Channel::Green)),
            EncodingKind::Blue => Box::new(ChannelEncoding::new(Channel::Blue)),
            EncodingKind::Alpha => Box::new(ChannelEncoding::new(Channel::Alpha)),
            EncodingKind::Luma => Box::new(LumaEncoding),
        }
    }
}

impl std::str::FromStr for EncodingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(EncodingKind::Red),
            "green" => Ok(EncodingKind::Green),
            "blue" => Ok(EncodingKind::Blue),
            "alpha" => Ok(EncodingKind::Alpha),
            "luma" => Ok(EncodingKind::Luma),
            other => Err(format!(
                "unknown encoding '{other}' (expected red, green, blue, alpha or luma)"
            )),
        }
    }
}
