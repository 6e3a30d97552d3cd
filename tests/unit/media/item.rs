use super::*;
use crate::media::engine::RepeatMode;
use crate::pool::renderer::Renderer;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Probe {
    calls: Vec<&'static str>,
    playing: bool,
    info: PlaybackInfo,
}

struct FakePlayer(Rc<RefCell<Probe>>);

impl MediaPlayer for FakePlayer {
    fn prepare(&mut self, _media: &MediaDescriptor, _load_source: bool) {
        self.0.borrow_mut().calls.push("prepare");
    }
    fn ready(&mut self) {
        self.0.borrow_mut().calls.push("ready");
    }
    fn play(&mut self) {
        let mut p = self.0.borrow_mut();
        p.calls.push("play");
        p.playing = true;
    }
    fn pause(&mut self) {
        let mut p = self.0.borrow_mut();
        p.calls.push("pause");
        p.playing = false;
    }
    fn reset(&mut self, full: bool) {
        self.0
            .borrow_mut()
            .calls
            .push(if full { "reset_full" } else { "reset" });
    }
    fn release(&mut self) {
        self.0.borrow_mut().calls.push("release");
    }
    fn seek(&mut self, position_ms: u64) {
        self.0.borrow_mut().info = PlaybackInfo::at(position_ms);
    }
    fn playback_info(&self) -> PlaybackInfo {
        self.0.borrow().info
    }
    fn set_playback_info(&mut self, info: PlaybackInfo) {
        self.0.borrow_mut().info = info;
    }
    fn state(&self) -> PlayerState {
        PlayerState::Ready
    }
    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }
    fn set_repeat_mode(&mut self, _mode: RepeatMode) {}
    fn attach_renderer(&mut self, _renderer: Option<Renderer>) {}
}

fn item_with_player() -> (MediaItem, Rc<RefCell<Probe>>) {
    let probe = Rc::new(RefCell::new(Probe::default()));
    let mut item = MediaItem::new(
        Some(MediaTag::new("a")),
        MediaDescriptor::video("a.mp4"),
        MediaConfig::default(),
    );
    item.player = Some(Box::new(FakePlayer(Rc::clone(&probe))));
    (item, probe)
}

#[test]
fn item_without_player_reports_idle_and_cached_info() {
    let mut item = MediaItem::new(None, MediaDescriptor::audio("x"), MediaConfig::default());
    assert_eq!(item.state(), PlayerState::Idle);
    assert!(!item.is_playing());
    item.set_playback_info(PlaybackInfo::at(1200));
    assert_eq!(item.playback_info(), PlaybackInfo::at(1200));
}

#[test]
fn play_and_pause_are_level_triggered() {
    let (mut item, probe) = item_with_player();
    item.play();
    item.play();
    item.pause();
    item.pause();
    assert_eq!(probe.borrow().calls, vec!["play", "pause"]);
}

#[test]
fn take_player_keeps_resume_state() {
    let (mut item, probe) = item_with_player();
    probe.borrow_mut().info = PlaybackInfo::at(4000);
    let player = item.take_player();
    assert!(player.is_some());
    assert!(item.player.is_none());
    assert_eq!(item.playback_info(), PlaybackInfo::at(4000));
    assert_eq!(probe.borrow().calls, vec!["release"]);
}

#[test]
fn full_reset_forgets_cached_position() {
    let mut item = MediaItem::new(None, MediaDescriptor::video("v"), MediaConfig::default());
    item.set_playback_info(PlaybackInfo::at(10));
    item.reset(false);
    assert_eq!(item.playback_info(), PlaybackInfo::at(10));
    item.reset(true);
    assert_eq!(item.playback_info(), PlaybackInfo::default());
}
