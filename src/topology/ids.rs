//! Entity identifiers and connection formats.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(u16);

        impl $name {
            /// Creates an id from its raw value.
            #[must_use]
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> u16 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u16> for $name {
            fn from(id: u16) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Identifier of an audio source.
    ///
    /// ```
    /// use audio_router::SourceId;
    ///
    /// let radio = SourceId::new(10);
    /// assert_eq!(radio, SourceId::from(10));
    /// assert_eq!(radio.to_string(), "10");
    /// ```
    SourceId
);
define_id!(
    /// Identifier of an audio sink.
    SinkId
);
define_id!(
    /// Identifier of a domain (an audio subsystem or bus).
    DomainId
);
define_id!(
    /// Identifier of a gateway.
    GatewayId
);
define_id!(
    /// Identifier of a converter.
    ConverterId
);
define_id!(
    /// Identifier of an established connection.
    ConnectionId
);

/// Signal encoding used on one hop of a route.
///
/// The well-known formats are associated constants. Any other value is a
/// vendor-specific format and is compared like the rest, by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConnectionFormat(u16);

impl ConnectionFormat {
    /// Format not determined.
    pub const UNKNOWN: Self = Self(0);
    /// Digital mono.
    pub const MONO: Self = Self(1);
    /// Digital stereo.
    pub const STEREO: Self = Self(2);
    /// Analog line.
    pub const ANALOG: Self = Self(3);
    /// Negotiated automatically by the endpoints.
    pub const AUTO: Self = Self(4);

    /// Creates a format from its raw value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ConnectionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::UNKNOWN => f.write_str("unknown"),
            Self::MONO => f.write_str("mono"),
            Self::STEREO => f.write_str("stereo"),
            Self::ANALOG => f.write_str("analog"),
            Self::AUTO => f.write_str("auto"),
            Self(other) => write!(f, "format-{other}"),
        }
    }
}

impl From<u16> for ConnectionFormat {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversion() {
        let id: SinkId = 42.into();
        assert_eq!(id.get(), 42);
        assert_eq!(format!("{id}"), "42");
        assert_eq!(DomainId::default().get(), 0);
    }

    #[test]
    fn test_connection_format_display() {
        assert_eq!(ConnectionFormat::STEREO.to_string(), "stereo");
        assert_eq!(ConnectionFormat::new(0x8001).to_string(), "format-32769");
    }

    #[test]
    fn test_connection_format_order() {
        let mut formats = vec![
            ConnectionFormat::ANALOG,
            ConnectionFormat::MONO,
            ConnectionFormat::STEREO,
        ];
        formats.sort();
        assert_eq!(
            formats,
            vec![
                ConnectionFormat::MONO,
                ConnectionFormat::STEREO,
                ConnectionFormat::ANALOG
            ]
        );
    }
}
