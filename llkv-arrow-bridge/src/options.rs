use llkv_types::TextLayout;

/// Offset width used for exported variable-length arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowOffsetSize {
    /// 32-bit offsets: `Utf8` / `Binary`.
    #[default]
    Regular,
    /// 64-bit offsets: `LargeUtf8` / `LargeBinary`.
    Large,
}

impl ArrowOffsetSize {
    /// String layout produced for text exported with this offset width.
    pub fn text_layout(self) -> TextLayout {
        match self {
            ArrowOffsetSize::Regular => TextLayout::Utf8,
            ArrowOffsetSize::Large => TextLayout::LargeUtf8,
        }
    }
}

/// Run-time conversion settings (no hidden constants).
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Offset width for exported text and binary columns.
    pub offset_size: ArrowOffsetSize,
    /// Export UUID columns as 16-byte `arrow.uuid` storage. When off, UUIDs
    /// are exported as hyphenated lowercase text without a tag.
    pub lossless_conversion: bool,
    /// Parse every imported `arrow.json` value and reject text that is not
    /// a JSON document. Off by default: values are taken as UTF-8 text.
    pub validate_json: bool,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            offset_size: ArrowOffsetSize::Regular,
            lossless_conversion: true,
            validate_json: false,
        }
    }
}
