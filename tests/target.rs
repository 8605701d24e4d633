use kiln2d::gpu::headless::{Command, HeadlessApi};
use kiln2d::gpu::{GpuLimits, GraphicsApi, IncompleteTarget, RenderAttachments, validate_target};
use kiln2d::{Color, RenderTarget};

// ── Creation ─────────────────────────────────────────────────────────────────

#[test]
fn test_create_allocates_attachments() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    assert!(target.create(&mut api, 800, 600, true, true));

    assert!(target.is_complete());
    assert!(target.has_depth());
    assert_eq!((target.width(), target.height()), (800, 600));
    assert!(target.color_attachment().is_some());
    assert_eq!(api.live_attachments(), 1);
}

#[test]
fn test_zero_width_fails_without_allocating() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    assert!(!target.create(&mut api, 0, 600, true, false));

    assert!(!target.is_complete());
    assert_eq!(target.color_attachment(), None);
    assert_eq!(api.allocations(), 0);
    assert_eq!(api.live_attachments(), 0);
}

#[test]
fn test_oversized_target_is_rejected() {
    let limits = GpuLimits { max_texture_slots: 16, max_texture_dimension: 1024 };
    let mut api = HeadlessApi::with_limits(limits);
    let mut target = RenderTarget::new("editor");
    assert!(!target.create(&mut api, 2048, 512, true, false));
    assert_eq!(api.allocations(), 0);
}

#[test]
fn test_target_without_attachments_is_incomplete() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("empty");
    assert!(!target.create(&mut api, 64, 64, false, false));
    assert_eq!(api.allocations(), 0);
}

#[test]
fn test_depth_only_target() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("shadow");
    assert!(target.create(&mut api, 64, 64, false, true));
    assert!(target.has_depth());
    assert_eq!(target.color_attachment(), None);
}

#[test]
fn test_recreate_releases_previous_attachments() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    assert!(target.create(&mut api, 100, 100, true, false));
    let first = target.color_attachment();
    assert!(target.create(&mut api, 200, 100, true, false));

    assert_ne!(target.color_attachment(), first);
    assert_eq!(api.allocations(), 2);
    assert_eq!(api.live_attachments(), 1);
}

#[test]
fn test_failed_recreate_leaves_target_empty() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    assert!(target.create(&mut api, 100, 100, true, false));
    assert!(!target.create(&mut api, 100, 0, true, false));
    assert!(!target.is_complete());
    assert_eq!(api.live_attachments(), 0);
}

// ── Resize ───────────────────────────────────────────────────────────────────

#[test]
fn test_resize_keeps_attachment_set() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    target.create(&mut api, 100, 100, true, true);
    assert!(target.resize(&mut api, 320, 240));

    assert_eq!((target.width(), target.height()), (320, 240));
    assert!(target.has_depth());
    assert!(target.color_attachment().is_some());
    assert_eq!(api.live_attachments(), 1);
}

#[test]
fn test_resize_to_zero_is_noop() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    target.create(&mut api, 100, 100, true, false);
    let color = target.color_attachment();

    assert!(!target.resize(&mut api, 0, 50));
    assert!(!target.resize(&mut api, 50, 0));
    assert_eq!(target.color_attachment(), color);
    assert_eq!((target.width(), target.height()), (100, 100));
    assert_eq!(api.allocations(), 1);
}

// ── Cleanup ──────────────────────────────────────────────────────────────────

#[test]
fn test_cleanup_is_idempotent() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    target.create(&mut api, 10, 10, true, true);
    target.cleanup();
    target.cleanup();
    assert!(!target.is_complete());
    assert_eq!(api.live_attachments(), 0);

    let mut never_created: RenderTarget<HeadlessApi> = RenderTarget::new("unused");
    never_created.cleanup();
    assert!(!never_created.is_complete());
}

#[test]
fn test_drop_releases_attachments() {
    let mut api = HeadlessApi::new();
    {
        let mut target = RenderTarget::new("scoped");
        target.create(&mut api, 10, 10, true, false);
        assert_eq!(api.live_attachments(), 1);
    }
    assert_eq!(api.live_attachments(), 0);
}

// ── Binding ──────────────────────────────────────────────────────────────────

#[test]
fn test_bind_and_unbind() {
    let mut api = HeadlessApi::new();
    let mut target = RenderTarget::new("play");
    target.create(&mut api, 10, 10, true, false);
    let color = target.color_attachment();

    assert!(target.bind(&mut api));
    assert!(target.clear(&mut api, Color::RED));
    target.unbind(&mut api);

    assert_eq!(
        api.commands(),
        &[Command::BindTarget(color), Command::Clear(Color::RED), Command::BindTarget(None)]
    );
}

#[test]
fn test_bind_fails_before_create() {
    let mut api = HeadlessApi::new();
    let target: RenderTarget<HeadlessApi> = RenderTarget::new("play");
    assert!(!target.bind(&mut api));
    target.unbind(&mut api);
    assert!(api.commands().is_empty());
}

#[test]
fn test_unbind_leaves_other_target_bound() {
    let mut api = HeadlessApi::new();
    let mut a = RenderTarget::new("a");
    let mut b = RenderTarget::new("b");
    a.create(&mut api, 10, 10, true, false);
    b.create(&mut api, 10, 10, true, false);

    b.bind(&mut api);
    a.unbind(&mut api);
    assert_eq!(api.commands(), &[Command::BindTarget(b.color_attachment())]);
}

#[test]
fn test_clear_only_touches_bound_target() {
    let mut api = HeadlessApi::new();
    let mut play = RenderTarget::new("play");
    let mut editor = RenderTarget::new("editor");
    play.create(&mut api, 10, 10, true, false);
    editor.create(&mut api, 10, 10, true, false);

    play.bind(&mut api);
    assert!(!editor.clear(&mut api, Color::BLACK));
    assert!(play.clear(&mut api, Color::RED));
    assert_eq!(
        api.commands(),
        &[Command::BindTarget(play.color_attachment()), Command::Clear(Color::RED)]
    );

    let empty: RenderTarget<HeadlessApi> = RenderTarget::new("empty");
    assert!(!empty.clear(&mut api, Color::RED));
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_validate_target_reasons() {
    let limits = GpuLimits::default();
    assert!(matches!(
        validate_target(&limits, 0, 10, true, false),
        Err(IncompleteTarget::ZeroExtent { width: 0, height: 10 })
    ));
    assert!(matches!(
        validate_target(&limits, 10, 10, false, false),
        Err(IncompleteTarget::MissingAttachment)
    ));
    assert!(matches!(
        validate_target(&limits, limits.max_texture_dimension + 1, 10, true, false),
        Err(IncompleteTarget::Unsupported { .. })
    ));
    assert!(validate_target(&limits, 10, 10, true, false).is_ok());
}

#[test]
fn test_headless_attachments_report_size() {
    let mut api = HeadlessApi::new();
    let attachments = api.create_attachments(30, 20, true, false).unwrap();
    assert_eq!(attachments.size(), (30, 20));
    assert!(!attachments.has_depth());
    assert!(attachments.color().is_some());
}
