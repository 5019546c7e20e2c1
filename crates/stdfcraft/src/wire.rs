//! Wire types: how many bytes a field occupies and how they are interpreted.

use std::{fmt, str::FromStr};

use crate::errors::CompileError;

/// Closed set of STDF V4 field encodings. Array variants (`X*`) repeat their base type a
/// number of times given by another field of the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// `C*1`: one character, 0x00 is absent.
    C1,
    /// `C*n`: length byte, then that many characters.
    Cn,
    U1,
    U2,
    U4,
    I1,
    I2,
    I4,
    R4,
    R8,
    /// `B*1`: one flag byte, kept as a binary string.
    B1,
    /// `B*n`: length byte, then that many bytes read as one binary number.
    Bn,
    /// `D*n`: bit count (U*2), then ceil(bits/8) bytes. Decodes to set-bit positions.
    Dn,
    /// `N*1`: low nibble of one byte.
    N1,
    /// `V*n`: self-describing elements, each with a leading type code.
    Vn,
    XC1,
    XCn,
    XU1,
    XU2,
    XU4,
    XI1,
    XI2,
    XI4,
    XR4,
    XR8,
    /// `xN*1`: nibbles packed two per byte.
    XN1,
}

impl WireType {
    /// Tag used in the STDF V4 document and in JSON schema definitions.
    pub fn tag(self) -> &'static str {
        match self {
            WireType::C1 => "C*1",
            WireType::Cn => "C*n",
            WireType::U1 => "U*1",
            WireType::U2 => "U*2",
            WireType::U4 => "U*4",
            WireType::I1 => "I*1",
            WireType::I2 => "I*2",
            WireType::I4 => "I*4",
            WireType::R4 => "R*4",
            WireType::R8 => "R*8",
            WireType::B1 => "B*1",
            WireType::Bn => "B*n",
            WireType::Dn => "D*n",
            WireType::N1 => "N*1",
            WireType::Vn => "V*n",
            WireType::XC1 => "xC*1",
            WireType::XCn => "xC*n",
            WireType::XU1 => "xU*1",
            WireType::XU2 => "xU*2",
            WireType::XU4 => "xU*4",
            WireType::XI1 => "xI*1",
            WireType::XI2 => "xI*2",
            WireType::XI4 => "xI*4",
            WireType::XR4 => "xR*4",
            WireType::XR8 => "xR*8",
            WireType::XN1 => "xN*1",
        }
    }

    /// True when the element count comes from another field.
    pub fn needs_count(self) -> bool {
        matches!(
            self,
            WireType::Vn
                | WireType::XC1
                | WireType::XCn
                | WireType::XU1
                | WireType::XU2
                | WireType::XU4
                | WireType::XI1
                | WireType::XI2
                | WireType::XI4
                | WireType::XR4
                | WireType::XR8
                | WireType::XN1
        )
    }

    /// Base type repeated by an array variant.
    pub fn element(self) -> Option<WireType> {
        match self {
            WireType::XC1 => Some(WireType::C1),
            WireType::XCn => Some(WireType::Cn),
            WireType::XU1 => Some(WireType::U1),
            WireType::XU2 => Some(WireType::U2),
            WireType::XU4 => Some(WireType::U4),
            WireType::XI1 => Some(WireType::I1),
            WireType::XI2 => Some(WireType::I2),
            WireType::XI4 => Some(WireType::I4),
            WireType::XR4 => Some(WireType::R4),
            WireType::XR8 => Some(WireType::R8),
            _ => None,
        }
    }

    pub const ALL: [WireType; 26] = [
        WireType::C1,
        WireType::Cn,
        WireType::U1,
        WireType::U2,
        WireType::U4,
        WireType::I1,
        WireType::I2,
        WireType::I4,
        WireType::R4,
        WireType::R8,
        WireType::B1,
        WireType::Bn,
        WireType::Dn,
        WireType::N1,
        WireType::Vn,
        WireType::XC1,
        WireType::XCn,
        WireType::XU1,
        WireType::XU2,
        WireType::XU4,
        WireType::XI1,
        WireType::XI2,
        WireType::XI4,
        WireType::XR4,
        WireType::XR8,
        WireType::XN1,
    ];
}

impl FromStr for WireType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WireType::ALL
            .into_iter()
            .find(|wire| wire.tag() == s)
            .ok_or_else(|| CompileError::UnknownWireType(s.to_string()))
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
