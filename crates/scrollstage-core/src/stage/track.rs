//! Piecewise interpolation of a single channel over [0, 1]

use serde::{Deserialize, Serialize};

use crate::scroll::{lerp, smoothstep};
use crate::{Error, Result};

/// Shape of a segment's interpolation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// Linear interpolation of smoothstep(t)
    #[default]
    Smoothstep,
    Linear,
    /// Stay at `from` for the whole segment
    Hold,
}

/// A contiguous sub-range of progress with its own interpolation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub from: f64,
    pub to: f64,
    #[serde(default)]
    pub curve: Curve,
}

impl Segment {
    /// Value at global progress `p` (assumed inside the segment)
    pub fn sample(&self, p: f64) -> f64 {
        let span = self.end - self.start;
        let t = if span > 0.0 {
            ((p - self.start) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        match self.curve {
            Curve::Hold => self.from,
            Curve::Linear => lerp(self.from, self.to, t),
            Curve::Smoothstep => lerp(self.from, self.to, smoothstep(t)),
        }
    }
}

/// Ordered, contiguous segments spanning exactly [0, 1]
///
/// Segments are half-open `[start, end)` except the last, which is closed,
/// so every progress value selects exactly one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct Track {
    segments: Vec<Segment>,
}

impl Track {
    /// Validate and build a track
    pub fn new(segments: Vec<Segment>) -> Result<Self> {
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Err(Error::InvalidPolicy("track has no segments".into()));
        };
        if first.start != 0.0 || last.end != 1.0 {
            return Err(Error::InvalidPolicy(format!(
                "track spans [{}, {}], expected [0, 1]",
                first.start, last.end
            )));
        }
        for segment in &segments {
            let finite = [segment.start, segment.end, segment.from, segment.to]
                .iter()
                .all(|v| v.is_finite());
            if !finite || segment.end < segment.start {
                return Err(Error::InvalidPolicy(format!("bad segment {:?}", segment)));
            }
        }
        for pair in segments.windows(2) {
            if pair[0].end != pair[1].start {
                return Err(Error::InvalidPolicy(format!(
                    "segments not contiguous at {} / {}",
                    pair[0].end, pair[1].start
                )));
            }
        }
        Ok(Self { segments })
    }

    /// The same value everywhere
    pub fn constant(value: f64) -> Self {
        Self {
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                from: value,
                to: value,
                curve: Curve::Hold,
            }],
        }
    }

    /// One smoothstep segment over the full range
    pub fn single(from: f64, to: f64) -> Self {
        Self {
            segments: vec![Segment {
                start: 0.0,
                end: 1.0,
                from,
                to,
                curve: Curve::Smoothstep,
            }],
        }
    }

    /// Start a track at `value` for progress 0
    pub fn starting_at(value: f64) -> TrackBuilder {
        TrackBuilder {
            cursor: 0.0,
            value,
            segments: Vec::new(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment boundaries in order, including 0 and 1
    pub fn boundaries(&self) -> Vec<f64> {
        let mut out = vec![0.0];
        out.extend(self.segments.iter().map(|s| s.end));
        out
    }

    /// Index of the segment that owns progress `p`
    pub fn segment_index(&self, p: f64) -> usize {
        let p = p.clamp(0.0, 1.0);
        self.segments
            .iter()
            .position(|s| p < s.end)
            .unwrap_or(self.segments.len() - 1)
    }

    /// Value at progress `p` (clamped to [0, 1])
    pub fn sample(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 1.0);
        self.segments[self.segment_index(p)].sample(p)
    }
}

impl TryFrom<Vec<Segment>> for Track {
    type Error = Error;

    fn try_from(value: Vec<Segment>) -> Result<Self> {
        Track::new(value)
    }
}

impl From<Track> for Vec<Segment> {
    fn from(value: Track) -> Self {
        value.segments
    }
}

/// Incremental construction of a contiguous track
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    cursor: f64,
    value: f64,
    segments: Vec<Segment>,
}

impl TrackBuilder {
    fn push(mut self, end: f64, to: f64, curve: Curve) -> Self {
        self.segments.push(Segment {
            start: self.cursor,
            end,
            from: self.value,
            to,
            curve,
        });
        self.cursor = end;
        self.value = if curve == Curve::Hold { self.value } else { to };
        self
    }

    /// Smoothstep from the current value to `to` by progress `end`
    pub fn ease_to(self, end: f64, to: f64) -> Self {
        self.push(end, to, Curve::Smoothstep)
    }

    /// Keep the current value until progress `end`
    pub fn hold_to(self, end: f64) -> Self {
        let value = self.value;
        self.push(end, value, Curve::Hold)
    }

    /// Close the track, holding the last value through 1.0
    pub fn build(self) -> Track {
        let builder = if self.cursor < 1.0 { self.hold_to(1.0) } else { self };
        Track {
            segments: builder.segments,
        }
    }
}
