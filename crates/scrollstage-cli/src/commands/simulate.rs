use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use scrollstage_core::scroll::ScrollConfigExt;
use scrollstage_core::{
    Engine, LayoutHost, Scene, ScrollInput, StageConfig, TriggerEventKind, Viewport,
};

/// One scripted input, applied right before frame `frame` runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    pub frame: u64,
    pub input: ScrollInput,
}

impl FromStr for ScriptStep {
    type Err = anyhow::Error;

    /// `FRAME:KIND:VALUE`, e.g. `0:wheel:120` or `30:scroll-to:2400`
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(frame), Some(kind), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
            anyhow::bail!("expected FRAME:KIND:VALUE, got '{}'", s);
        };

        let frame: u64 = frame
            .trim()
            .parse()
            .with_context(|| format!("invalid frame number in '{}'", s))?;
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("invalid value in '{}'", s))?;
        if !value.is_finite() {
            anyhow::bail!("value must be finite in '{}'", s);
        }

        let input = match kind.trim() {
            "wheel" => ScrollInput::Wheel(value),
            "touch" => ScrollInput::Touch(value),
            "scroll-to" => ScrollInput::ScrollTo(value),
            "jump-to" => ScrollInput::JumpTo(value),
            other => anyhow::bail!(
                "unknown input kind '{}' (expected wheel, touch, scroll-to or jump-to)",
                other
            ),
        };

        Ok(Self { frame, input })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulateOptions {
    pub frames: u64,
    /// Scripted input; empty means one smooth scroll to the bottom
    pub steps: Vec<ScriptStep>,
    pub realtime: bool,
    pub events_only: bool,
}

impl SimulateOptions {
    pub fn parse(frames: u64, inputs: &[String], realtime: bool, events_only: bool) -> Result<Self> {
        let steps = inputs
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<ScriptStep>>>()?;

        Ok(Self {
            frames,
            steps,
            realtime,
            events_only,
        })
    }
}

pub async fn run(config: &StageConfig, scene: &Scene, options: SimulateOptions) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    simulate(config, scene, &options, &mut out).await?;
    out.flush()?;
    Ok(())
}

/// Drive the engine for `options.frames` frames and write one JSON frame per line
///
/// Frame `n` runs at `n` animation ticks of engine time. In realtime mode
/// frames are additionally paced by a wall-clock interval. Returns the
/// number of frames written.
pub async fn simulate<W: Write>(
    config: &StageConfig,
    scene: &Scene,
    options: &SimulateOptions,
    out: &mut W,
) -> Result<u64> {
    let viewport = Viewport {
        width: config.viewport.width,
        height: config.viewport.height,
    };
    let mut layout = scene.layout(viewport);
    let mut engine = Engine::new(&config.scroll, scene, &mut layout);

    let tick = config.scroll.animation_tick_duration();
    let mut interval = options.realtime.then(|| tokio::time::interval(tick));
    let mut written = 0;

    for n in 0..options.frames {
        if let Some(interval) = interval.as_mut() {
            interval.tick().await;
        }

        if options.steps.is_empty() {
            if n == 0 {
                engine.push(ScrollInput::ScrollTo(layout.scroll_limit()));
            }
        } else {
            for step in options.steps.iter().filter(|s| s.frame == n) {
                debug!(frame = n, input = ?step.input, "scripted input");
                engine.push(step.input);
            }
        }

        let frame = engine.tick(frame_time(tick, n), &mut layout);

        if options.events_only
            && !frame
                .events
                .iter()
                .any(|e| !matches!(e.kind, TriggerEventKind::Update { .. }))
        {
            continue;
        }

        serde_json::to_writer(&mut *out, &frame)?;
        writeln!(out)?;
        written += 1;
    }

    info!(
        frames = options.frames,
        written,
        offset = engine.page_state().virtual_offset,
        "simulation finished"
    );
    Ok(written)
}

fn frame_time(tick: Duration, n: u64) -> Duration {
    tick.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(buf)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn has_event(frames: &[serde_json::Value], trigger: &str, kind: &str) -> bool {
        frames.iter().any(|f| {
            f["events"]
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e["trigger"] == trigger && e["kind"] == kind)
        })
    }

    #[test]
    fn test_parse_steps() {
        let step: ScriptStep = "12:wheel:-120".parse().unwrap();
        assert_eq!(step.frame, 12);
        assert_eq!(step.input, ScrollInput::Wheel(-120.0));

        let step: ScriptStep = "0:jump-to:2400".parse().unwrap();
        assert_eq!(step.input, ScrollInput::JumpTo(2400.0));

        let step: ScriptStep = " 3 : scroll-to : 50.5 ".parse().unwrap();
        assert_eq!(step.frame, 3);
        assert_eq!(step.input, ScrollInput::ScrollTo(50.5));
    }

    #[test]
    fn test_parse_errors() {
        assert!("12:wheel".parse::<ScriptStep>().is_err());
        assert!("x:wheel:1".parse::<ScriptStep>().is_err());
        assert!("1:fling:1".parse::<ScriptStep>().is_err());
        assert!("1:wheel:abc".parse::<ScriptStep>().is_err());
        assert!("1:wheel:inf".parse::<ScriptStep>().is_err());

        let inputs = vec!["0:wheel:120".to_string(), "bad".to_string()];
        assert!(SimulateOptions::parse(10, &inputs, false, false).is_err());
    }

    #[tokio::test]
    async fn test_default_script_scrolls_past_pinned_section() {
        let config = StageConfig::default();
        let scene = Scene::landing_page();
        let options = SimulateOptions::parse(180, &[], false, true).unwrap();

        let mut buf = Vec::new();
        let written = simulate(&config, &scene, &options, &mut buf).await.unwrap();
        let frames = lines(&buf);

        assert_eq!(written as usize, frames.len());
        assert!(written > 0 && written < 180);
        assert!(has_event(&frames, "hero", "enter"));
        assert!(has_event(&frames, "services-pin", "leave"));
        assert!(!has_event(&frames, "services-pin", "leave_back"));
        // only boundary frames are kept
        for frame in &frames {
            assert!(frame["events"]
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e["kind"] != "update"));
        }
    }

    #[tokio::test]
    async fn test_scripted_round_trip_fires_leave_back() {
        let config = StageConfig::default();
        let scene = Scene::landing_page();
        let inputs = vec!["0:jump-to:2000".to_string(), "5:jump-to:0".to_string()];
        let options = SimulateOptions::parse(10, &inputs, false, false).unwrap();

        let mut buf = Vec::new();
        let written = simulate(&config, &scene, &options, &mut buf).await.unwrap();
        let frames = lines(&buf);

        assert_eq!(written, 10);
        assert_eq!(frames[0]["scroll"]["virtual_offset"], 2000.0);
        assert_eq!(frames[9]["scroll"]["virtual_offset"], 0.0);
        assert!(has_event(&frames, "hero", "leave"));
        assert!(has_event(&frames, "services-pin", "leave_back"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_paces_frames() {
        let config = StageConfig::default();
        let scene = Scene::landing_page();
        let options = SimulateOptions::parse(30, &[], true, false).unwrap();

        let start = tokio::time::Instant::now();
        let mut buf = Vec::new();
        let written = simulate(&config, &scene, &options, &mut buf).await.unwrap();

        assert_eq!(written, 30);
        let tick = config.scroll.animation_tick_duration();
        // the first interval tick completes immediately
        assert!(start.elapsed() >= tick * 29);
    }
}
