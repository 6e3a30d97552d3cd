#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use autoplay::{
    BindOptions, BindingCallback, BindingId, LifecycleState, MediaConfig, MediaDescriptor,
    MediaEngine, MediaId, MediaPlayer, PlaybackInfo, PlaybackListener, PlayerState, Rect,
    Registry, RegistryOpts, Renderer, RendererHandle, RendererHost, RendererKey, RepeatMode,
    SchedulerScopeId, SchedulerScopeOpts, SelectionObserver, SelectionScopeId,
    SelectionScopeOpts, SlotGeometry, SlotId, SlotKind, TopScopeId,
};

/// Everything the mocks saw, in order.
#[derive(Debug, Default)]
pub struct Log {
    pub events: Vec<String>,
}

impl Log {
    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn has(&self, event: &str) -> bool {
        self.count(event) > 0
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

pub type SharedLog = Rc<RefCell<Log>>;

fn record(log: &SharedLog, event: String) {
    log.borrow_mut().events.push(event);
}

pub struct MockPlayer {
    log: SharedLog,
    uri: String,
    playing: bool,
    state: PlayerState,
    info: PlaybackInfo,
}

impl MediaPlayer for MockPlayer {
    fn prepare(&mut self, media: &MediaDescriptor, load_source: bool) {
        self.uri = media.uri.clone();
        if load_source {
            self.state = PlayerState::Buffering;
            record(&self.log, format!("load {}", self.uri));
        }
    }
    fn ready(&mut self) {
        self.state = PlayerState::Ready;
    }
    fn play(&mut self) {
        self.playing = true;
        record(&self.log, format!("play {}", self.uri));
    }
    fn pause(&mut self) {
        self.playing = false;
        record(&self.log, format!("pause {}", self.uri));
    }
    fn reset(&mut self, full: bool) {
        self.playing = false;
        self.state = PlayerState::Idle;
        if full {
            self.info = PlaybackInfo::default();
            record(&self.log, format!("reset_full {}", self.uri));
        } else {
            record(&self.log, format!("reset {}", self.uri));
        }
    }
    fn release(&mut self) {
        self.playing = false;
        self.state = PlayerState::Idle;
        record(&self.log, format!("release {}", self.uri));
    }
    fn seek(&mut self, position_ms: u64) {
        self.info.resume_position_ms = position_ms;
    }
    fn playback_info(&self) -> PlaybackInfo {
        self.info
    }
    fn set_playback_info(&mut self, info: PlaybackInfo) {
        self.info = info;
    }
    fn state(&self) -> PlayerState {
        self.state
    }
    fn is_playing(&self) -> bool {
        self.playing
    }
    fn set_repeat_mode(&mut self, _mode: RepeatMode) {}
    fn attach_renderer(&mut self, renderer: Option<Renderer>) {
        if let Some(renderer) = renderer {
            record(&self.log, format!("render {} {renderer:?}", self.uri));
        }
    }
}

pub struct MockEngine {
    pub log: SharedLog,
    pub recycle: bool,
}

impl MediaEngine for MockEngine {
    fn create_player(&mut self, media: &MediaDescriptor) -> Box<dyn MediaPlayer> {
        record(&self.log, format!("create {}", media.uri));
        Box::new(MockPlayer {
            log: Rc::clone(&self.log),
            uri: media.uri.clone(),
            playing: false,
            state: PlayerState::Idle,
            info: PlaybackInfo::default(),
        })
    }

    fn destroy_player(&mut self, player: Box<dyn MediaPlayer>) {
        record(&self.log, "destroy player".to_owned());
        drop(player);
    }

    fn recycle_player_for(&self, _media: &MediaDescriptor) -> bool {
        self.recycle
    }
}

pub struct MockRenderers {
    pub log: SharedLog,
    pub next: u64,
}

impl RendererHost for MockRenderers {
    fn create_renderer(&mut self, key: &RendererKey) -> Option<RendererHandle> {
        self.next += 1;
        record(&self.log, format!("renderer+ {} {:?}", self.next, key.renderer));
        Some(RendererHandle(self.next))
    }

    fn destroy_renderer(&mut self, handle: RendererHandle) {
        record(&self.log, format!("renderer- {}", handle.0));
    }

    fn on_renderer_attached(&mut self, slot: SlotId, handle: RendererHandle) {
        record(&self.log, format!("attach {} {}", handle.0, slot.0));
    }

    fn on_renderer_detached(&mut self, slot: SlotId, handle: RendererHandle) {
        record(&self.log, format!("detach {} {}", handle.0, slot.0));
    }
}

/// A registry with one window, one screen and one vertical list.
pub struct Fixture {
    pub registry: Registry,
    pub log: SharedLog,
    pub top: TopScopeId,
    pub scheduler: SchedulerScopeId,
    pub selection: SelectionScopeId,
}

pub fn fixture() -> Fixture {
    fixture_with(
        RegistryOpts::default(),
        SchedulerScopeOpts::default(),
        SelectionScopeOpts::default(),
    )
}

pub fn fixture_with(
    opts: RegistryOpts,
    scheduler_opts: SchedulerScopeOpts,
    selection_opts: SelectionScopeOpts,
) -> Fixture {
    let log: SharedLog = Rc::new(RefCell::new(Log::default()));
    let mut registry = Registry::new(
        opts,
        Box::new(MockEngine {
            log: Rc::clone(&log),
            recycle: true,
        }),
        Box::new(MockRenderers {
            log: Rc::clone(&log),
            next: 0,
        }),
    )
    .expect("fixture options are valid");
    let top = registry.register_top_scope(LifecycleState::Resumed);
    let scheduler = registry
        .register_scheduler_scope(top, scheduler_opts)
        .expect("top exists");
    let selection = registry
        .register_selection_scope(scheduler, selection_opts)
        .expect("scheduler exists");
    Fixture {
        registry,
        log,
        top,
        scheduler,
        selection,
    }
}

impl Fixture {
    /// Register a container slot in the default selection scope.
    pub fn slot(&mut self, id: u64, geometry: SlotGeometry) -> SlotId {
        self.slot_in(self.selection, id, SlotKind::Container, geometry)
    }

    pub fn slot_in(
        &mut self,
        selection: SelectionScopeId,
        id: u64,
        kind: SlotKind,
        geometry: SlotGeometry,
    ) -> SlotId {
        let slot = SlotId(id);
        self.registry
            .register_slot(selection, slot, kind, geometry)
            .expect("slot registers");
        slot
    }

    pub fn bind(&mut self, slot: SlotId, uri: &str, options: BindOptions) -> MediaId {
        self.registry
            .bind(
                MediaDescriptor::video(uri),
                MediaConfig::default(),
                slot,
                options,
            )
            .expect("bind request is valid")
    }

    /// Let debounced refreshes and deferred work run.
    pub fn settle(&mut self) {
        self.registry.advance_by(100);
    }

    pub fn binding(&self, slot: SlotId) -> BindingId {
        self.registry
            .binding_for_slot(slot)
            .expect("slot is bound")
    }

    pub fn selection(&self) -> Vec<BindingId> {
        self.registry
            .selection(self.top)
            .expect("top exists")
            .to_vec()
    }

    pub fn clear_log(&self) {
        self.log.borrow_mut().events.clear();
    }

    pub fn has(&self, event: &str) -> bool {
        self.log.borrow().has(event)
    }

    pub fn count(&self, event: &str) -> usize {
        self.log.borrow().count(event)
    }

    pub fn position(&self, event: &str) -> Option<usize> {
        self.log.borrow().position(event)
    }
}

/// A 100x100 slot whose top edge is at `y`, with `visible` pixels of its height on screen.
pub fn at(y: f64, visible: f64) -> SlotGeometry {
    let drawable = Rect::new(0.0, y, 100.0, y + 100.0);
    SlotGeometry::visible(drawable, Rect::new(0.0, y, 100.0, y + visible))
}

/// A 100x100 slot centered at `center_y`, showing `visible` pixels around its center.
pub fn centered(center_y: f64, visible: f64) -> SlotGeometry {
    let drawable = Rect::new(0.0, center_y - 50.0, 100.0, center_y + 50.0);
    let half = visible / 2.0;
    SlotGeometry::visible(drawable, Rect::new(0.0, center_y - half, 100.0, center_y + half))
}

/// Attached and laid out, but scrolled out of the viewport.
pub fn off_screen(y: f64) -> SlotGeometry {
    SlotGeometry {
        attached: true,
        laid_out: true,
        visible_rect: None,
        drawable: Rect::new(0.0, y, 100.0, y + 100.0),
    }
}

#[derive(Default)]
pub struct Recorder {
    pub events: RefCell<Vec<String>>,
}

impl Recorder {
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl BindingCallback for Recorder {
    fn on_added(&self, _binding: BindingId) {
        self.push("added".into());
    }
    fn on_attached(&self, _binding: BindingId) {
        self.push("attached".into());
    }
    fn on_active(&self, _binding: BindingId) {
        self.push("active".into());
    }
    fn on_inactive(&self, _binding: BindingId) {
        self.push("inactive".into());
    }
    fn on_detached(&self, _binding: BindingId) {
        self.push("detached".into());
    }
    fn on_removed(&self, _binding: BindingId) {
        self.push("removed".into());
    }
}

impl PlaybackListener for Recorder {
    fn on_buffering(&self, _binding: BindingId, play_when_ready: bool) {
        self.push(format!("buffering {play_when_ready}"));
    }
    fn on_playing(&self, _binding: BindingId) {
        self.push("playing".into());
    }
    fn on_paused(&self, _binding: BindingId) {
        self.push("paused".into());
    }
    fn on_ended(&self, _binding: BindingId) {
        self.push("ended".into());
    }
    fn on_video_size_changed(&self, _binding: BindingId, width: u32, height: u32) {
        self.push(format!("size {width}x{height}"));
    }
    fn on_rendered_first_frame(&self, _binding: BindingId) {
        self.push("first frame".into());
    }
    fn on_error(&self, _binding: BindingId, error: &anyhow::Error) {
        self.push(format!("error {error}"));
    }
}

impl SelectionObserver for Recorder {
    fn on_selection(&self, _scope: SchedulerScopeId, selection: &[BindingId]) {
        self.push(format!("selection {}", selection.len()));
    }
}
