use anyhow::{Result, anyhow, bail, ensure};
use core::fmt;
use logos::{Lexer, Logos};
use std::str::FromStr;

/// An IPv4 address (or subnet mask) held as its 32-bit integer value.
///
/// Parsing via [`FromStr`] validates the dotted-quad format and the octet
/// ranges once, at the configuration boundary. Everything past that point
/// is plain integer arithmetic on trusted values, the way router firmware
/// treats addresses it has already accepted into its configuration.
///
/// ## Example
///
/// ```
/// use routesim_core::Addr;
///
/// let ip: Addr = "192.168.1.10".parse().unwrap();
/// let mask: Addr = "255.255.255.0".parse().unwrap();
///
/// assert_eq!(ip.to_string(), "192.168.1.10");
/// assert!(Addr::same_subnet(ip, "192.168.1.1".parse().unwrap(), mask));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Addr(u32);

impl Addr {
    /// The all-zero address, `0.0.0.0`.
    pub const UNSPECIFIED: Self = Self(0);

    /// Classful /8 mask, `255.0.0.0`.
    pub const MASK_8: Self = Self::from_octets(255, 0, 0, 0);
    /// Classful /16 mask, `255.255.0.0`.
    pub const MASK_16: Self = Self::from_octets(255, 255, 0, 0);
    /// Classful /24 mask, `255.255.255.0`.
    pub const MASK_24: Self = Self::from_octets(255, 255, 255, 0);

    /// Build an address from its four octets, most significant first.
    pub const fn from_octets(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8) | (d as u32))
    }

    /// The raw 32-bit value, network order interpreted as an integer.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// The four octets, most significant first.
    pub const fn octets(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Are `a` and `b` on the same subnet under `mask`?
    ///
    /// `(a & mask) == (b & mask)`.
    #[inline]
    pub const fn same_subnet(a: Self, b: Self, mask: Self) -> bool {
        a.0 & mask.0 == b.0 & mask.0
    }

    /// Does this address fall inside the subnet `network`/`mask`?
    #[inline]
    pub const fn in_subnet(self, network: Self, mask: Self) -> bool {
        Self::same_subnet(self, network, mask)
    }

    /// The classful subnet mask implied by this address's first octet.
    ///
    /// Historical IPv4 classes: 1–126 → /8, 128–191 → /16, 192–223 → /24.
    /// Anything else (0, 127, the class D/E range) falls back to /24,
    /// permissive on purpose: this is a pedagogical simulator rather
    /// than a strict implementation.
    ///
    /// ```
    /// use routesim_core::Addr;
    ///
    /// let ip: Addr = "10.1.2.3".parse().unwrap();
    /// assert_eq!(ip.implied_mask(), Addr::MASK_8);
    /// ```
    pub const fn implied_mask(self) -> Self {
        match self.octets()[0] {
            1..=126 => Self::MASK_8,
            128..=191 => Self::MASK_16,
            192..=223 => Self::MASK_24,
            _ => Self::MASK_24,
        }
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl FromStr for Addr {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut lex = Lexer::new(s.trim());

        let mut octets = [0u8; 4];
        for (position, octet) in octets.iter_mut().enumerate() {
            if position != 0 {
                let Some(Ok(Token::Dot)) = lex.next() else {
                    bail!("Expecting 4 dot-separated octets, cannot parse `{s}'")
                };
            }
            let Some(next) = lex.next() else {
                bail!("Expecting 4 dot-separated octets, cannot parse `{s}'")
            };
            let token: Token = next.map_err(|()| anyhow!("Failed to parse `{s}'"))?;
            ensure!(
                token == Token::Value,
                "Expecting an octet value, cannot parse `{s}'"
            );
            *octet = lex
                .slice()
                .parse()
                .map_err(|error| anyhow!("Octet out of range in `{s}': {error}"))?;
        }

        ensure!(lex.next().is_none(), "Trailing input, cannot parse `{s}'");

        let [a, b, c, d] = octets;
        Ok(Self::from_octets(a, b, c, d))
    }
}

#[derive(Logos, Debug, PartialEq)]
enum Token {
    #[token(".")]
    Dot,

    #[regex("[0-9]+")]
    Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logos_lexer() {
        let mut lex = Token::lexer("10.0");

        assert_eq!(lex.next(), Some(Ok(Token::Value)));
        assert_eq!(lex.slice(), "10");
        assert_eq!(lex.next(), Some(Ok(Token::Dot)));
        assert_eq!(lex.next(), Some(Ok(Token::Value)));
        assert_eq!(lex.slice(), "0");
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn parse() {
        let addr: Addr = "192.168.1.10".parse().unwrap();
        assert_eq!(addr, Addr::from_octets(192, 168, 1, 10));

        let addr: Addr = " 8.8.8.8 ".parse().unwrap();
        assert_eq!(addr, Addr::from_octets(8, 8, 8, 8));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("".parse::<Addr>().is_err());
        assert!("192.168.1".parse::<Addr>().is_err());
        assert!("192.168.1.10.3".parse::<Addr>().is_err());
        assert!("192.168.1.256".parse::<Addr>().is_err());
        assert!("192.168..1".parse::<Addr>().is_err());
        assert!("a.b.c.d".parse::<Addr>().is_err());
        assert!("192,168,1,1".parse::<Addr>().is_err());
    }

    #[test]
    fn display_round_trip() {
        let addr = Addr::from_octets(10, 0, 0, 1);
        assert_eq!(addr.to_string(), "10.0.0.1");
        assert_eq!(addr.to_string().parse::<Addr>().unwrap(), addr);
    }

    #[test]
    fn subnet_membership() {
        let a: Addr = "192.168.1.10".parse().unwrap();
        let b: Addr = "192.168.1.200".parse().unwrap();
        let c: Addr = "192.168.2.10".parse().unwrap();

        assert!(Addr::same_subnet(a, b, Addr::MASK_24));
        assert!(!Addr::same_subnet(a, c, Addr::MASK_24));
        assert!(Addr::same_subnet(a, c, Addr::MASK_16));
    }

    #[test]
    fn implied_mask_classes() {
        let mask = |s: &str| s.parse::<Addr>().unwrap().implied_mask();

        assert_eq!(mask("1.0.0.1"), Addr::MASK_8);
        assert_eq!(mask("10.0.0.1"), Addr::MASK_8);
        assert_eq!(mask("126.1.1.1"), Addr::MASK_8);
        assert_eq!(mask("128.1.1.1"), Addr::MASK_16);
        assert_eq!(mask("191.1.1.1"), Addr::MASK_16);
        assert_eq!(mask("192.168.1.1"), Addr::MASK_24);
        assert_eq!(mask("223.1.1.1"), Addr::MASK_24);

        // outside the classful ranges everything degrades to /24
        assert_eq!(mask("0.1.1.1"), Addr::MASK_24);
        assert_eq!(mask("127.0.0.1"), Addr::MASK_24);
        assert_eq!(mask("224.0.0.1"), Addr::MASK_24);
        assert_eq!(mask("255.255.255.255"), Addr::MASK_24);
    }
}
