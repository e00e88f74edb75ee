//! Trigger boundary notation
//!
//! A [`Position`] names a point on the anchor and a point on the viewport;
//! the boundary is the scroll offset at which the two meet. Written as
//! `"<anchor> <viewport>"`, e.g. `"top top"`, `"75% top"`, `"top bottom"`,
//! `"center 40%"`, `"top top+=80px"`.
//!
//! An [`EndBound`] is either another position or a distance past the start:
//! `"+=4vh"`, `"+=1h+4vh"` (anchor height plus four viewports), `"+=1200px"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::{AnchorRect, Viewport};
use crate::{Error, Result};

/// A point along a box: `fraction` of its size plus `px`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub fraction: f64,
    pub px: f64,
}

impl Edge {
    pub const TOP: Edge = Edge { fraction: 0.0, px: 0.0 };
    pub const CENTER: Edge = Edge { fraction: 0.5, px: 0.0 };
    pub const BOTTOM: Edge = Edge { fraction: 1.0, px: 0.0 };

    #[inline]
    pub fn resolve(&self, size: f64) -> f64 {
        self.fraction * size + self.px
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (base, offset) = match s.find("+=").or_else(|| s.find("-=")) {
            Some(idx) => {
                let sign = if s[idx..].starts_with('-') { -1.0 } else { 1.0 };
                (&s[..idx], sign * parse_px(&s[idx + 2..])?)
            }
            None => (s, 0.0),
        };

        let mut edge = match base {
            "top" => Edge::TOP,
            "center" => Edge::CENTER,
            "bottom" => Edge::BOTTOM,
            other => {
                if let Some(pct) = other.strip_suffix('%') {
                    Edge {
                        fraction: parse_number(pct)? / 100.0,
                        px: 0.0,
                    }
                } else {
                    Edge {
                        fraction: 0.0,
                        px: parse_px(other)?,
                    }
                }
            }
        };
        edge.px += offset;
        Ok(edge)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = if self.fraction == 0.0 {
            "top".to_string()
        } else if self.fraction == 0.5 {
            "center".to_string()
        } else if self.fraction == 1.0 {
            "bottom".to_string()
        } else {
            format!("{}%", self.fraction * 100.0)
        };
        if self.px > 0.0 {
            write!(f, "{}+={}px", base, self.px)
        } else if self.px < 0.0 {
            write!(f, "{}-={}px", base, -self.px)
        } else {
            f.write_str(&base)
        }
    }
}

/// Where an anchor point meets a viewport point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    pub anchor: Edge,
    pub viewport: Edge,
}

impl Position {
    pub const TOP_TOP: Position = Position {
        anchor: Edge::TOP,
        viewport: Edge::TOP,
    };

    /// Scroll offset at which the two points coincide
    pub fn resolve(&self, anchor: AnchorRect, viewport: Viewport) -> f64 {
        anchor.top + self.anchor.resolve(anchor.height) - self.viewport.resolve(viewport.height)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(anchor), Some(viewport), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::InvalidPosition(format!(
                "expected \"<anchor> <viewport>\", got {:?}",
                s
            )));
        };
        Ok(Self {
            anchor: anchor.parse()?,
            viewport: viewport.parse()?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.anchor, self.viewport)
    }
}

impl TryFrom<String> for Position {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.to_string()
    }
}

/// End of a trigger region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EndBound {
    /// An absolute position, like the start
    At(Position),
    /// Distance past the start: anchor heights + viewport heights + px
    Span {
        anchor_multiple: f64,
        viewport_multiple: f64,
        px: f64,
    },
}

impl EndBound {
    /// Span of `k` viewport heights past the start
    pub fn viewports(k: f64) -> Self {
        EndBound::Span {
            anchor_multiple: 0.0,
            viewport_multiple: k,
            px: 0.0,
        }
    }

    /// Resolve to a scroll offset given the already-resolved start
    pub fn resolve(&self, start: f64, anchor: AnchorRect, viewport: Viewport) -> f64 {
        match self {
            EndBound::At(position) => position.resolve(anchor, viewport),
            EndBound::Span {
                anchor_multiple,
                viewport_multiple,
                px,
            } => start + anchor_multiple * anchor.height + viewport_multiple * viewport.height + px,
        }
    }
}

impl FromStr for EndBound {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some(span) = s.strip_prefix("+=") else {
            return Ok(EndBound::At(s.parse()?));
        };

        let mut anchor_multiple = 0.0;
        let mut viewport_multiple = 0.0;
        let mut px = 0.0;
        for term in span.split('+').map(str::trim) {
            if let Some(n) = term.strip_suffix("vh") {
                viewport_multiple += parse_number(n)?;
            } else if let Some(n) = term.strip_suffix('%') {
                viewport_multiple += parse_number(n)? / 100.0;
            } else if let Some(n) = term.strip_suffix('h') {
                anchor_multiple += parse_number(n)?;
            } else {
                px += parse_px(term)?;
            }
        }
        Ok(EndBound::Span {
            anchor_multiple,
            viewport_multiple,
            px,
        })
    }
}

impl fmt::Display for EndBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndBound::At(position) => position.fmt(f),
            EndBound::Span {
                anchor_multiple,
                viewport_multiple,
                px,
            } => {
                let mut terms = Vec::new();
                if *anchor_multiple != 0.0 {
                    terms.push(format!("{}h", anchor_multiple));
                }
                if *viewport_multiple != 0.0 {
                    terms.push(format!("{}vh", viewport_multiple));
                }
                if *px != 0.0 || terms.is_empty() {
                    terms.push(format!("{}px", px));
                }
                write!(f, "+={}", terms.join("+"))
            }
        }
    }
}

impl TryFrom<String> for EndBound {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<EndBound> for String {
    fn from(value: EndBound) -> Self {
        value.to_string()
    }
}

fn parse_number(s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::InvalidPosition(format!("not a number: {:?}", s)))
}

fn parse_px(s: &str) -> Result<f64> {
    let s = s.trim();
    parse_number(s.strip_suffix("px").unwrap_or(s))
}
