use super::*;

struct HalfManual;

impl ManualController for HalfManual {
    fn can_start(&self) -> bool {
        true
    }
}

#[test]
fn defaults_match_documented_values() {
    let opts = BindOptions::default();
    assert_eq!(opts.threshold, 0.65);
    assert_eq!(opts.delay_ms, 0);
    assert!(!opts.preload);
    assert!(opts.tag.is_none());
    assert!(opts.controller.is_none());
    opts.validate().unwrap();
}

#[test]
fn builder_sets_every_field() {
    let opts = BindOptions::new()
        .tag("clip")
        .threshold(0.3)
        .delay_ms(250)
        .preload(true)
        .repeat_mode(RepeatMode::One)
        .controller(Rc::new(HalfManual))
        .initial_resume_state(PlaybackInfo::at(900));
    assert_eq!(opts.tag, Some(MediaTag::new("clip")));
    assert_eq!(opts.threshold, 0.3);
    assert_eq!(opts.delay_ms, 250);
    assert!(opts.preload);
    assert_eq!(opts.repeat_mode, RepeatMode::One);
    assert!(opts.controller.as_ref().is_some_and(|c| c.can_start() && c.can_pause()));
    assert_eq!(opts.initial_resume_state, Some(PlaybackInfo::at(900)));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    for bad in [-0.1, 1.5, f64::NAN] {
        let err = BindOptions::new().threshold(bad).validate().unwrap_err();
        assert!(matches!(err, AutoplayError::Validation(_)));
    }
    BindOptions::new().threshold(1.0).validate().unwrap();
    BindOptions::new().threshold(0.0).validate().unwrap();
}

#[test]
fn empty_tag_is_rejected() {
    assert!(BindOptions::new().tag("").validate().is_err());
}
