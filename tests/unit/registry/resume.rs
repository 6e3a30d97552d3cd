use super::*;
use crate::foundation::arena::Handle;

fn tag(s: &str) -> ResumeKey {
    ResumeKey::Tag(MediaTag::new(s))
}

#[test]
fn first_writer_wins() {
    let mut store = ResumeStore::default();
    assert!(store.try_save(tag("a"), PlaybackInfo::at(100)));
    assert!(!store.try_save(tag("a"), PlaybackInfo::at(900)));
    assert_eq!(store.get(&tag("a")), Some(PlaybackInfo::at(100)));
}

#[test]
fn take_removes_the_entry() {
    let mut store = ResumeStore::default();
    let info = PlaybackInfo {
        resume_window: 2,
        resume_position_ms: 4321,
    };
    store.try_save(tag("a"), info);
    assert_eq!(store.take(&tag("a")), Some(info));
    assert_eq!(store.take(&tag("a")), None);
    assert!(store.try_save(tag("a"), PlaybackInfo::at(1)));
}

#[test]
fn snapshot_only_exports_tagged_entries() {
    let mut store = ResumeStore::default();
    store.try_save(tag("a"), PlaybackInfo::at(5));
    store.try_save(ResumeKey::Binding(BindingId::from_raw(1)), PlaybackInfo::at(6));
    let snap = store.snapshot();
    assert_eq!(snap.entries.len(), 1);
    assert_eq!(snap.entries.get(&MediaTag::new("a")), Some(&PlaybackInfo::at(5)));
}

#[test]
fn seeding_keeps_existing_entries() {
    let mut store = ResumeStore::default();
    store.try_save(tag("a"), PlaybackInfo::at(5));
    let mut snap = ResumeSnapshot::default();
    snap.entries.insert(MediaTag::new("a"), PlaybackInfo::at(50));
    snap.entries.insert(MediaTag::new("b"), PlaybackInfo::at(60));
    assert_eq!(store.seed(snap), 1);
    assert_eq!(store.get(&tag("a")), Some(PlaybackInfo::at(5)));
    assert_eq!(store.get(&tag("b")), Some(PlaybackInfo::at(60)));
}

#[test]
fn snapshot_json_uses_tags_as_keys() {
    let mut snap = ResumeSnapshot::default();
    snap.entries.insert(MediaTag::new("clip"), PlaybackInfo::at(250));
    let json = snap.to_json().unwrap();
    assert!(json.contains("\"clip\""));
    assert_eq!(ResumeSnapshot::from_json(&json).unwrap(), snap);
    assert!(matches!(
        ResumeSnapshot::from_json("[]").unwrap_err(),
        AutoplayError::Serde(_)
    ));
}
