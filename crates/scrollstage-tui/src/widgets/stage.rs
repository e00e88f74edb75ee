//! Canvas rendering of a frame
//!
//! The preview is a stand-in for a real page: each cluster is drawn as a row
//! of outlined cards inside the section its trigger observes, and every
//! card gets its element's visual state applied as a 2D transform.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders,
    },
    Frame,
};
use scrollstage_core::stage::LengthUnit;
use scrollstage_core::{LayoutHost, VisualState};

use crate::app::App;

/// Distance of the virtual camera for `z` translation, px
const PERSPECTIVE: f64 = 1000.0;

/// Untransformed element box in screen px (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

/// Corners of an element after applying its visual state
///
/// Rotation around the vertical axis is shown as horizontal foreshortening.
pub fn element_quad(base: ElementBox, state: &VisualState) -> [(f64, f64); 4] {
    let (dx, dy) = match state.unit {
        LengthUnit::Percent => (state.x / 100.0 * base.width, state.y / 100.0 * base.height),
        LengthUnit::Pixels => (state.x, state.y),
    };
    let depth = PERSPECTIVE / (PERSPECTIVE - state.z.min(PERSPECTIVE - 1.0));
    let flip = state.rotation_y.to_radians().cos().abs().max(0.05);
    let half_w = base.width * state.scale * depth * flip / 2.0;
    let half_h = base.height * state.scale * depth / 2.0;
    let (sin, cos) = state.rotation.to_radians().sin_cos();
    let (cx, cy) = (base.cx + dx, base.cy + dy);

    [(-half_w, -half_h), (half_w, -half_h), (half_w, half_h), (-half_w, half_h)]
        .map(|(x, y)| (cx + x * cos - y * sin, cy + x * sin + y * cos))
}

/// Evenly spaced boxes for `count` elements across one row
pub fn row_boxes(top: f64, height: f64, width: f64, count: usize) -> Vec<ElementBox> {
    if count == 0 {
        return Vec::new();
    }
    let slot = width / count as f64;
    (0..count)
        .map(|i| ElementBox {
            cx: slot * (i as f64 + 0.5),
            cy: top + height / 2.0,
            width: slot * 0.6,
            height: height * 0.6,
        })
        .collect()
}

/// One outlined quad to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub corners: [(f64, f64); 4],
    pub color: Color,
}

/// Screen-space shapes for the app's last frame
pub fn frame_shapes(app: &App) -> Vec<Shape> {
    let Some(frame) = app.frame.as_ref() else {
        return Vec::new();
    };
    let scroll = frame.scroll.virtual_offset;
    let viewport = app.viewport;

    // Clusters sharing a section split it into rows
    let anchors: Vec<_> = frame
        .clusters
        .iter()
        .map(|c| app.cluster_anchor(&c.id))
        .collect();

    let mut shapes = Vec::new();
    for (index, cluster) in frame.clusters.iter().enumerate() {
        let Some(anchor) = anchors[index] else {
            continue;
        };
        let siblings: Vec<usize> = (0..anchors.len())
            .filter(|&i| anchors[i] == Some(anchor))
            .collect();
        let row = siblings.iter().position(|&i| i == index).unwrap_or(0);

        // Pinned clusters fill the viewport wherever their positioning puts them
        let (section_top, section_height) = match cluster.positioning {
            Some(positioning) => (positioning.screen_top(scroll), viewport.height),
            None => (anchor.top - scroll, anchor.height.min(viewport.height)),
        };
        let row_height = section_height / siblings.len() as f64;
        let row_top = section_top + row_height * row as f64;

        let boxes = row_boxes(row_top, row_height, viewport.width, cluster.elements.len());
        for (base, state) in boxes.into_iter().zip(&cluster.elements) {
            if state.opacity < 0.05 {
                continue;
            }
            shapes.push(Shape {
                corners: element_quad(base, state),
                color: app.theme.cluster_color(index, state.opacity),
            });
        }
    }
    shapes
}

pub struct StageWidget;

impl StageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let viewport = app.viewport;
        let scroll = app.scroll_state().virtual_offset;
        let shapes = frame_shapes(app);

        // Section boundaries currently on screen
        let boundaries: Vec<f64> = app
            .scene
            .sections
            .iter()
            .filter_map(|s| app.layout.anchor(&s.id).map(|a| a.top))
            .map(|top| top - scroll)
            .filter(|y| *y >= 0.0 && *y <= viewport.height)
            .collect();

        let title = format!(" {:.0}px / {:.0}px ", scroll, app.scroll_limit());
        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.grey0))
                    .title(title),
            )
            .background_color(app.theme.bg0)
            .marker(Marker::Braille)
            .x_bounds([0.0, viewport.width])
            .y_bounds([0.0, viewport.height])
            .paint(|ctx| {
                let flip = |y: f64| viewport.height - y;
                for y in &boundaries {
                    ctx.draw(&CanvasLine {
                        x1: 0.0,
                        y1: flip(*y),
                        x2: viewport.width,
                        y2: flip(*y),
                        color: app.theme.bg2,
                    });
                }
                for shape in &shapes {
                    for i in 0..4 {
                        let (x1, y1) = shape.corners[i];
                        let (x2, y2) = shape.corners[(i + 1) % 4];
                        ctx.draw(&CanvasLine {
                            x1,
                            y1: flip(y1),
                            x2,
                            y2: flip(y2),
                            color: shape.color,
                        });
                    }
                }
            });

        frame.render_widget(canvas, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: ElementBox = ElementBox {
        cx: 100.0,
        cy: 100.0,
        width: 40.0,
        height: 20.0,
    };

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_identity_quad_is_base_box() {
        let quad = element_quad(BASE, &VisualState::IDENTITY);
        assert!(close(quad[0], (80.0, 90.0)));
        assert!(close(quad[2], (120.0, 110.0)));
    }

    #[test]
    fn test_percent_translation_uses_box_size() {
        let state = VisualState {
            x: 50.0,
            y: -100.0,
            ..VisualState::IDENTITY
        };
        let quad = element_quad(BASE, &state);
        assert!(close(quad[0], (100.0, 70.0)));
    }

    #[test]
    fn test_pixel_translation() {
        let state = VisualState {
            y: -150.0,
            unit: LengthUnit::Pixels,
            ..VisualState::IDENTITY
        };
        let quad = element_quad(BASE, &state);
        assert!(close(quad[0], (80.0, -60.0)));
    }

    #[test]
    fn test_half_flip_foreshortens() {
        let state = VisualState {
            rotation_y: 60.0,
            ..VisualState::IDENTITY
        };
        let quad = element_quad(BASE, &state);
        let width = quad[1].0 - quad[0].0;
        assert!((width - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_keeps_center() {
        let state = VisualState {
            rotation: -15.0,
            scale: 0.75,
            ..VisualState::IDENTITY
        };
        let quad = element_quad(BASE, &state);
        let cx = quad.iter().map(|p| p.0).sum::<f64>() / 4.0;
        let cy = quad.iter().map(|p| p.1).sum::<f64>() / 4.0;
        assert!(close((cx, cy), (BASE.cx, BASE.cy)));
    }

    #[test]
    fn test_row_boxes() {
        let boxes = row_boxes(0.0, 100.0, 300.0, 3);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[1].cx, 150.0);
        assert_eq!(boxes[0].width, 60.0);
        assert!(row_boxes(0.0, 100.0, 300.0, 0).is_empty());
    }

    #[test]
    fn test_frame_shapes_for_landing_page() {
        use scrollstage_core::{Scene, StageConfig};

        use crate::theme::Theme;

        let mut app = App::new(&StageConfig::default(), Scene::landing_page(), Theme::default());
        assert!(frame_shapes(&app).is_empty());
        app.tick(std::time::Duration::ZERO);
        // hero container and hero cards sit at the top of the page
        assert!(frame_shapes(&app).len() >= 4);
    }
}
