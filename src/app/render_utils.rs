use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::graph::NodeKind;
use crate::interaction::ViewTransform;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Democrat => Color32::from_rgb(72, 131, 224),
        NodeKind::Republican => Color32::from_rgb(217, 83, 79),
        NodeKind::OtherParty => Color32::from_rgb(176, 160, 96),
        NodeKind::Bill => Color32::from_rgb(128, 196, 148),
    }
}

/// Radius in content units; legislators grow with the bills they share with
/// the focal member.
pub(super) fn node_radius(kind: NodeKind, weight: u32, max_weight: u32, is_focal: bool) -> f32 {
    if is_focal {
        return 13.0;
    }
    if kind == NodeKind::Bill {
        return 4.0;
    }
    let t = if max_weight == 0 {
        0.0
    } else {
        (weight as f32 / max_weight as f32).sqrt()
    };
    5.0 + (t * 6.0)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, transform: ViewTransform) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * transform.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + transform.translate;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focal_node_is_largest() {
        let focal = node_radius(NodeKind::Democrat, 0, 40, true);
        assert!(focal > node_radius(NodeKind::Democrat, 40, 40, false));
        assert!(node_radius(NodeKind::Republican, 40, 40, false) > node_radius(NodeKind::Republican, 4, 40, false));
        assert_eq!(node_radius(NodeKind::Bill, 0, 0, false), 4.0);
    }
}
