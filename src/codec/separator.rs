use bytes::{BufMut, Bytes, BytesMut};

/// The default message separator.
pub const CRLF: &[u8] = b"\r\n";

/// A non-empty byte sequence that terminates every message on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Separator(Bytes);

impl Separator {
    /// Create a separator from raw bytes.
    ///
    /// Returns `None` for an empty sequence, which cannot delimit anything.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            None
        } else {
            Some(Self(bytes))
        }
    }

    /// The `\r\n` separator.
    #[must_use]
    pub const fn crlf() -> Self {
        Self(Bytes::from_static(CRLF))
    }

    /// Get the separator bytes.
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the separator in bytes.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the separator has no bytes. Never true for a constructed separator.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::crlf()
    }
}

impl AsRef<[u8]> for Separator {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Applies separator framing to outgoing and incoming bytes.
///
/// With no separator configured the framer is transparent: messages go out
/// verbatim and any received bytes count as a complete message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Framer {
    separator: Option<Separator>,
}

impl Framer {
    /// Create a framer for the given separator.
    #[must_use]
    pub const fn new(separator: Option<Separator>) -> Self {
        Self { separator }
    }

    /// Get the configured separator, if any.
    #[must_use]
    pub const fn separator(&self) -> Option<&Separator> {
        self.separator.as_ref()
    }

    /// Build the wire payload for `message`.
    ///
    /// The separator is appended unless it is absent or `message` already
    /// ends with it.
    #[must_use]
    pub fn frame(&self, message: &[u8]) -> Bytes {
        match &self.separator {
            Some(sep) if !message.ends_with(sep.as_bytes()) => {
                let mut buf = BytesMut::with_capacity(message.len() + sep.len());
                buf.put_slice(message);
                buf.put_slice(sep.as_bytes());
                buf.freeze()
            }
            _ => Bytes::copy_from_slice(message),
        }
    }

    /// Check whether `buf` holds a complete response.
    ///
    /// Without a separator this is always `true`: one successful read is
    /// one message.
    #[must_use]
    pub fn is_complete(&self, buf: &[u8]) -> bool {
        match &self.separator {
            Some(sep) => buf.ends_with(sep.as_bytes()),
            None => true,
        }
    }

    /// Strip one trailing separator from `message`, if present.
    #[must_use]
    pub fn strip<'a>(&self, message: &'a [u8]) -> &'a [u8] {
        match &self.separator {
            Some(sep) => message
                .strip_suffix(sep.as_bytes())
                .unwrap_or(message),
            None => message,
        }
    }
}
