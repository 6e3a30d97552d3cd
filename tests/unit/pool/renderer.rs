use super::*;

#[test]
fn surface_slot_renders_surface_media_directly() {
    let plan = plan_renderer(SlotKind::Surface, MediaKind::Video, RendererKind::Surface).unwrap();
    assert_eq!(plan, RendererPlan::Slot);
}

#[test]
fn surface_slot_rejects_texture_renderer() {
    let err =
        plan_renderer(SlotKind::Surface, MediaKind::Video, RendererKind::Texture).unwrap_err();
    assert!(matches!(err, AutoplayError::UnsupportedRenderer(_)));
    assert!(err.to_string().starts_with("unsupported renderer:"));
}

#[test]
fn container_slot_goes_through_the_pool() {
    let plan =
        plan_renderer(SlotKind::Container, MediaKind::Video, RendererKind::Texture).unwrap();
    assert_eq!(
        plan,
        RendererPlan::Pooled(RendererKey {
            slot: SlotKind::Container,
            media: MediaKind::Video,
            renderer: RendererKind::Texture,
        })
    );
}

#[test]
fn audio_needs_no_renderer() {
    for slot in [SlotKind::Surface, SlotKind::Container] {
        assert_eq!(
            plan_renderer(slot, MediaKind::Audio, RendererKind::None).unwrap(),
            RendererPlan::None
        );
    }
}
