use {
    crate::{DisplayRotation, Resolution},
    base::{Mat3, Rect, Vec2},
};

/// Transform that maps the preview buffer onto a `viewport`-sized surface.
///
/// Sensor buffers are landscape-native, so the buffer rectangle is the preview
/// size with width and height swapped. For quarter-turn displays the buffer is
/// centered on the viewport, fill-cropped by
/// `max(viewport.h / preview.h, viewport.w / preview.w)` and turned by
/// `90 * (quadrant - 2)` degrees about the center. A 180° display only turns
/// about the center and a 0° display needs nothing.
///
/// A viewport with a zero dimension yields the identity.
pub fn compute_transform(preview: &Resolution, viewport: Vec2<u32>, rotation: DisplayRotation) -> Mat3<f32> {
    if viewport.x == 0 || viewport.y == 0 {
        log::warn!("Viewport {}x{} has no area, using identity transform", viewport.x, viewport.y);
        return Mat3::identity();
    }

    let view_rect = Rect::from_size(viewport.to_f32());
    let center = view_rect.center();

    match rotation {
        DisplayRotation::Rotation90 | DisplayRotation::Rotation270 => {
            let preview_size = preview.size().to_f32();
            let buffer_rect = Rect::from_size(preview_size.swapped()).centered_on(center);
            let scale = f32::max(
                view_rect.size.y / preview_size.y,
                view_rect.size.x / preview_size.x,
            );
            let degrees = (90 * (rotation.quadrant() - 2)) as f32;
            Mat3::rect_to_rect(view_rect, buffer_rect)
                .post_scale_about(scale, scale, center)
                .post_rotate_about(degrees, center)
        }
        DisplayRotation::Rotation180 => Mat3::identity().post_rotate_about(180.0, center),
        DisplayRotation::Rotation0 => Mat3::identity(),
    }
}
