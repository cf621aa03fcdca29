//! Classification tables as seen from outside the crate.

use std::collections::BTreeSet;

use winmsg_hook::events::{InputSource, SizeKind, SizingEdge};
use winmsg_hook::model::config::DEFAULT_TRAY_CALLBACK;
use winmsg_hook::model::constants::*;
use winmsg_hook::model::message::make_param;
use winmsg_hook::{Classifier, EventKind, HookConfig, RawMessage, TrayProtocol, WindowEvent};

// === Coverage ===

#[test]
fn every_observed_kind_has_a_source_code() {
    let produced: BTreeSet<EventKind> = Classifier::recognized_codes()
        .into_iter()
        .chain(Classifier::recognized_tray_codes())
        .map(|(_, kind)| kind)
        .collect();

    for kind in EventKind::ALL {
        assert_eq!(
            produced.contains(&kind),
            !kind.is_derived(),
            "{:?} coverage mismatch",
            kind
        );
    }
}

#[test]
fn tray_callback_is_never_a_window_code() {
    assert_eq!(Classifier::window_kind(DEFAULT_TRAY_CALLBACK), None);
    assert!(Classifier::recognized_codes()
        .iter()
        .all(|(code, _)| *code < WM_USER));
}

#[test]
fn system_range_callback_is_rejected_by_config() {
    let config = HookConfig::from_json(r#"{ "tray_callback_message": 3 }"#).unwrap();
    assert_eq!(config.tray_callback_message, None);

    let classifier = Classifier::new(&config);
    let event = classifier.classify(&RawMessage::new(WM_MOVE, 0, 0)).unwrap();
    assert_eq!(event.kind(), EventKind::WindowMoved);
}

// === Window vs tray source ===

#[test]
fn same_mouse_code_differs_by_envelope() {
    let classifier = Classifier::default();

    let direct = classifier
        .classify(&RawMessage::new(WM_RBUTTONUP, 0, 0))
        .unwrap();
    let via_tray = classifier
        .classify(&RawMessage::new(
            DEFAULT_TRAY_CALLBACK,
            0,
            make_param(WM_RBUTTONUP as u16, 9) as isize,
        ))
        .unwrap();

    assert!(matches!(
        direct,
        WindowEvent::PointerButton {
            source: InputSource::Window,
            ..
        }
    ));
    assert!(matches!(
        via_tray,
        WindowEvent::PointerButton {
            source: InputSource::TrayIcon { icon_id: 9 },
            ..
        }
    ));
}

#[test]
fn tray_only_codes_are_ignored_outside_the_envelope() {
    let classifier = Classifier::default();
    assert_eq!(classifier.classify(&RawMessage::new(NIN_BALLOONSHOW, 0, 0)), None);
    assert_eq!(classifier.classify(&RawMessage::new(NIN_POPUPOPEN, 0, 0)), None);
}

#[test]
fn legacy_and_version4_agree_on_kind() {
    let v4 = Classifier::default();
    let legacy = Classifier::new(&HookConfig::with_tray(
        DEFAULT_TRAY_CALLBACK,
        TrayProtocol::Legacy,
    ));

    let a = v4
        .classify(&RawMessage::new(
            DEFAULT_TRAY_CALLBACK,
            0,
            make_param(NIN_POPUPCLOSE as u16, 1) as isize,
        ))
        .unwrap();
    let b = legacy
        .classify(&RawMessage::new(DEFAULT_TRAY_CALLBACK, 1, NIN_POPUPCLOSE as isize))
        .unwrap();
    assert_eq!(a, b);
}

// === Parameter decoding ===

#[test]
fn unknown_size_and_edge_values_are_kept() {
    let classifier = Classifier::default();
    let size = classifier
        .classify(&RawMessage::new(WM_SIZE, 42, make_param(10, 20) as isize))
        .unwrap();
    assert_eq!(
        size,
        WindowEvent::WindowResized {
            kind: SizeKind::Other(42),
            width: 10,
            height: 20
        }
    );

    let sizing = classifier
        .classify(&RawMessage::new(WM_SIZING, 99, 0))
        .unwrap();
    assert_eq!(
        sizing,
        WindowEvent::WindowResizing {
            edge: SizingEdge::Unknown(99)
        }
    );
}

#[test]
fn enable_and_setting_change_payloads() {
    let classifier = Classifier::default();
    assert_eq!(
        classifier.classify(&RawMessage::new(WM_ENABLE, 0, 0)),
        Some(WindowEvent::EnabledStateChanged { enabled: false })
    );
    assert_eq!(
        classifier.classify(&RawMessage::new(WM_SYSCOLORCHANGE, 0, 0)),
        Some(WindowEvent::SystemSettingChanged { setting: None })
    );
    assert_eq!(
        classifier.classify(&RawMessage::new(WM_DWMCOLORIZATIONCOLORCHANGED, 0, 0)),
        Some(WindowEvent::ThemeChanged { colorization: true })
    );
}
