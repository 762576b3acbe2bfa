use super::*;
use crate::parser::CommandParser;
use crate::topic::TopicCodec;

fn reconciler() -> Reconciler {
    Reconciler::from_config(&ClubroomConfig::default()).unwrap()
}

fn command(keyword: Keyword, remainder: Option<&str>) -> Input {
    Input::Command(ParsedCommand {
        keyword,
        remainder: remainder.map(str::to_string),
    })
}

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn rec(status: ClubStatus, extra: &str) -> StatusRecord {
    StatusRecord::new(status, extra)
}

#[test]
fn test_commands_set_status_and_extra() {
    let r = reconciler();
    let old = rec(ClubStatus::Closed, "old note");
    let cases = [
        (Keyword::Open, Some("back in 10"), ClubStatus::Open, "back in 10"),
        (Keyword::Closed, None, ClubStatus::Closed, ""),
        (Keyword::Closed, Some("see you"), ClubStatus::Closed, "see you"),
        (Keyword::Status, None, ClubStatus::Open, ""),
        (Keyword::Reserved, Some("D&D"), ClubStatus::Reserved, "D&D"),
        (Keyword::Reserved, None, ClubStatus::Reserved, ""),
    ];
    for (keyword, remainder, status, extra) in cases {
        let t = r.next(&old, &command(keyword, remainder));
        assert_eq!(t.record, rec(status, extra), "{keyword:?} {remainder:?}");
        assert_eq!(t.resync, Resync::BOTH);
        assert!(!t.report);
    }
}

#[test]
fn test_presence_invariant_after_every_command() {
    let r = reconciler();
    let keywords = [
        Keyword::Open,
        Keyword::Closed,
        Keyword::Status,
        Keyword::Reserved,
    ];
    for start in [ClubStatus::Open, ClubStatus::Closed, ClubStatus::Reserved] {
        for keyword in keywords {
            let t = r.next(&rec(start, "x"), &command(keyword, Some("y")));
            assert_eq!(
                t.record.presence(),
                t.record.status != ClubStatus::Closed,
                "{start:?} + {keyword:?}"
            );
        }
    }
}

#[test]
fn test_varattu_without_remainder() {
    let parser = CommandParser::new(&["Cortana".to_string()], ".");
    let cmd = parser.parse(".varattu").unwrap();
    let t = reconciler().next(&StatusRecord::default(), &Input::Command(cmd));
    assert_eq!(t.record, rec(ClubStatus::Reserved, ""));
    assert!(t.record.presence());
}

#[test]
fn test_command_is_idempotent() {
    let r = reconciler();
    let codec = TopicCodec::new("JMT11CD: ", "|");
    let input = command(Keyword::Open, Some("back in 10"));
    let topic = "JMT11CD: closed |#general stuff";

    let first = r.next(&StatusRecord::default(), &input);
    let topic_1 = codec.apply(topic, &first.record);
    let second = r.next(&first.record, &input);
    let topic_2 = codec.apply(&topic_1, &second.record);

    assert_eq!(first, second);
    assert_eq!(topic_1, topic_2);
}

#[test]
fn test_command_extra_is_sanitized() {
    let t = reconciler().next(
        &StatusRecord::default(),
        &command(Keyword::Open, Some("  pizza | beer  ")),
    );
    assert_eq!(t.record.extra, "pizza / beer");
}

#[test]
fn test_status_keyword_report_policy_leaves_state() {
    let r = Reconciler::new(StatusKeywordPolicy::Report, "|", "00:00", "24:00")
        .unwrap();
    let old = rec(ClubStatus::Closed, "gone fishing");
    let t = r.next(&old, &command(Keyword::Status, Some("ignored")));
    assert_eq!(t.record, old);
    assert_eq!(t.resync, Resync::NONE);
    assert!(t.report);

    // Other keywords behave the same under either policy.
    let t = r.next(&old, &command(Keyword::Open, None));
    assert_eq!(t.record.status, ClubStatus::Open);
}

#[test]
fn test_poll_button_pressed_opens_and_keeps_extra() {
    let t = reconciler().next(
        &rec(ClubStatus::Closed, "back at 18"),
        &Input::PollTick {
            present: true,
            now: at(17, 0),
        },
    );
    assert_eq!(t.record, rec(ClubStatus::Open, "back at 18"));
    assert_eq!(t.resync, Resync::TOPIC);
}

#[test]
fn test_poll_button_released_closes_and_clears_extra() {
    for old_status in [ClubStatus::Open, ClubStatus::Reserved] {
        let t = reconciler().next(
            &rec(old_status, "back in 10"),
            &Input::PollTick {
                present: false,
                now: at(3, 15),
            },
        );
        assert_eq!(t.record, rec(ClubStatus::Closed, ""));
        assert_eq!(t.resync, Resync::TOPIC);
    }
}

#[test]
fn test_poll_close_outside_window_keeps_extra() {
    let r = Reconciler::new(StatusKeywordPolicy::Open, "|", "00:00", "06:00")
        .unwrap();
    let t = r.next(
        &rec(ClubStatus::Open, "back in 10"),
        &Input::PollTick {
            present: false,
            now: at(14, 0),
        },
    );
    assert_eq!(t.record, rec(ClubStatus::Closed, "back in 10"));

    let t = r.next(
        &rec(ClubStatus::Open, "back in 10"),
        &Input::PollTick {
            present: false,
            now: at(2, 0),
        },
    );
    assert_eq!(t.record.extra, "");
}

#[test]
fn test_stale_note_window_wraps_midnight() {
    let r = Reconciler::new(StatusKeywordPolicy::Open, "|", "22:00", "06:00")
        .unwrap();
    assert!(r.in_stale_note_window(at(23, 30)));
    assert!(r.in_stale_note_window(at(1, 0)));
    assert!(!r.in_stale_note_window(at(12, 0)));
    assert!(reconciler().in_stale_note_window(at(0, 0)));
    assert!(reconciler().in_stale_note_window(at(23, 59)));
}

#[test]
fn test_stale_note_window_bounds_must_be_padded() {
    let bad = [
        ("0:00", "06:00"),
        ("00:00", "6:00"),
        ("24:00", "06:00"),
        ("00:00", "25:00"),
    ];
    for (start, end) in bad {
        let err = Reconciler::new(StatusKeywordPolicy::Open, "|", start, end).unwrap_err();
        assert!(matches!(err, CortanaError::Config(_)), "{start}-{end}");
    }

    let r = Reconciler::new(StatusKeywordPolicy::Open, "|", "00:00", "06:00").unwrap();
    assert!(!r.in_stale_note_window(at(14, 0)));
    assert!(r.in_stale_note_window(at(5, 59)));
    assert!(!r.in_stale_note_window(at(6, 0)));
}

#[test]
fn test_poll_noop_when_file_matches() {
    let r = reconciler();
    let cases = [
        (rec(ClubStatus::Open, "x"), true),
        (rec(ClubStatus::Reserved, ""), true),
        (rec(ClubStatus::Closed, "y"), false),
    ];
    for (old, present) in cases {
        let t = r.next(
            &old,
            &Input::PollTick {
                present,
                now: at(12, 0),
            },
        );
        assert_eq!(t.record, old);
        assert_eq!(t.resync, Resync::NONE);
        assert!(!t.resync.any());
    }
}

#[test]
fn test_command_closed_keeps_remainder_regardless_of_time() {
    // Note clearing belongs to the button path only.
    let t = reconciler().next(
        &rec(ClubStatus::Open, "old"),
        &command(Keyword::Closed, Some("back at 9")),
    );
    assert_eq!(t.record, rec(ClubStatus::Closed, "back at 9"));
}

#[test]
fn test_topic_observed_adopts_and_resyncs_presence() {
    let codec = TopicCodec::new("JMT11CD: ", "|");
    let observed = codec.decode("JMT11CD: closed ");
    let t = reconciler().next(
        &rec(ClubStatus::Open, ""),
        &Input::TopicObserved {
            status: observed.status.unwrap(),
            extra: observed.extra,
        },
    );
    assert_eq!(t.record, rec(ClubStatus::Closed, ""));
    assert!(!t.record.presence());
    assert_eq!(t.resync, Resync::PRESENCE);

    // A later write keeps the passthrough segment.
    let topic = codec.apply("JMT11CD: open |#general stuff", &t.record);
    assert_eq!(topic, "JMT11CD: closed |#general stuff");
}

#[test]
fn test_topic_observed_same_state_is_noop() {
    let old = rec(ClubStatus::Reserved, "movie night");
    let t = reconciler().next(
        &old,
        &Input::TopicObserved {
            status: ClubStatus::Reserved,
            extra: "movie night".into(),
        },
    );
    assert_eq!(t.record, old);
    assert_eq!(t.resync, Resync::NONE);
}

#[test]
fn test_topic_observed_extra_change_only() {
    let t = reconciler().next(
        &rec(ClubStatus::Open, ""),
        &Input::TopicObserved {
            status: ClubStatus::Open,
            extra: "pizza".into(),
        },
    );
    assert_eq!(t.record, rec(ClubStatus::Open, "pizza"));
    assert_eq!(t.resync, Resync::PRESENCE);
}

#[test]
fn test_apply_rejects_untracked_channel() {
    let mut store = StatusStore::new();
    let err = reconciler()
        .apply(&mut store, "#ghost", &command(Keyword::Open, None))
        .unwrap_err();
    assert!(matches!(err, CortanaError::UntrackedChannel(ref c) if c == "#ghost"));
    assert!(store.is_empty());
}

#[test]
fn test_apply_stores_result() {
    let mut store = StatusStore::new();
    store.register("#polygame");
    let t = reconciler()
        .apply(
            &mut store,
            "#polygame",
            &command(Keyword::Open, Some("back in 10")),
        )
        .unwrap();
    assert_eq!(store.get("#polygame").unwrap(), &t.record);
}

#[test]
fn test_example_addressed_command_against_closed_topic() {
    let parser = CommandParser::new(&["Cortana".to_string()], ".");
    let codec = TopicCodec::new("JMT11CD: ", "|");
    let topic = "JMT11CD: closed ";
    let decoded = codec.decode(topic);
    let mut store = StatusStore::new();
    store.register("#polygame");
    let r = reconciler();
    r.apply(
        &mut store,
        "#polygame",
        &Input::TopicObserved {
            status: decoded.status.unwrap(),
            extra: decoded.extra,
        },
    )
    .unwrap();

    let cmd = parser.parse("Hey, Cortana, open back in 10").unwrap();
    let t = r.apply(&mut store, "#polygame", &Input::Command(cmd)).unwrap();
    assert_eq!(t.record, rec(ClubStatus::Open, "back in 10"));
    assert!(t.record.presence());

    let new_topic = codec.apply(topic, &t.record);
    let segment_0 = new_topic.split('|').next().unwrap();
    assert_eq!(segment_0, "JMT11CD: open, back in 10 ");
}
