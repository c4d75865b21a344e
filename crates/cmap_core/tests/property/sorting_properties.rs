use cmap_core::Taxonomy;
use cmap_core::actions::{SortedAction, TopLevelBody, sort_actions};
use cmap_core::raw::RawHistoryEvent;
use proptest::prelude::*;

// Few dates, times and bodies so that ties and duplicates are common.
const DATES: &[&str] = &["2023-01-05", "2023-01-10", "2023-02-01"];
const TIMES: &[&str] = &["00:00:00", "09:30:00", "18:00:00"];
const BODIES: &[&str] = &[
    "CMAP Board",
    "CMAP Board of Directors",
    "Transportation Committee",
    "Finance Committee",
];
const MOTIONS: &[&str] = &["approved", "approved by voice vote"];
const NAMES: &[&str] = &[
    "Direct Introduction",
    "referred",
    "approved and referred",
    "discussed",
    "recommended for approval",
    "approved",
    "Failed to Pass",
    "Signed by Mayor",
    "Repealed",
];

fn top_level() -> TopLevelBody {
    TopLevelBody {
        body: "CMAP Board".into(),
        organization: "CMAP Board of Directors".into(),
    }
}

fn history_event() -> impl Strategy<Value = RawHistoryEvent> {
    (
        prop::sample::select(DATES),
        prop::sample::select(TIMES),
        prop::sample::select(NAMES),
        prop::sample::select(BODIES),
        prop::option::of(prop::sample::select(MOTIONS)),
    )
        .prop_map(|(date, time, name, body, text)| RawHistoryEvent {
            history_id: 0,
            action_date: format!("{date}T{time}"),
            action_name: name.to_string(),
            action_text: text.map(str::to_string),
            body_name: body.to_string(),
            event_id: None,
            roll_call_flag: None,
            passed_flag: None,
        })
}

fn history() -> impl Strategy<Value = Vec<RawHistoryEvent>> {
    prop::collection::vec(history_event(), 0..24).prop_map(|mut events| {
        for (index, event) in events.iter_mut().enumerate() {
            event.history_id = index as i64;
        }
        events
    })
}

fn sort_key(taxonomy: &Taxonomy, sorted: &SortedAction<'_>) -> (String, u8, String) {
    let (date, time) = sorted.event.date_parts();
    let order = taxonomy
        .lookup(&sorted.event.action_name)
        .map(|rule| rule.order)
        .unwrap_or(u8::MAX);
    (date.to_string(), order, time.to_string())
}

proptest! {
    #[test]
    fn sorted_actions_never_go_backwards(events in history()) {
        let taxonomy = Taxonomy::builtin();
        let sorted = sort_actions(&events, &taxonomy, &top_level()).unwrap();
        for pair in sorted.windows(2) {
            let earlier = sort_key(&taxonomy, &pair[0]);
            let later = sort_key(&taxonomy, &pair[1]);
            prop_assert!(earlier <= later, "{:?} sorted before {:?}", earlier, later);
        }
    }

    #[test]
    fn no_two_adjacent_actions_are_equal(events in history()) {
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level()).unwrap();
        for pair in sorted.windows(2) {
            prop_assert!(!pair[0].action.same_as(&pair[1].action));
        }
    }

    #[test]
    fn every_dropped_event_duplicates_a_kept_one(events in history()) {
        let top_level = top_level();
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level).unwrap();
        prop_assert_eq!(sorted.is_empty(), events.is_empty());

        for event in &events {
            if sorted.iter().any(|s| s.event.history_id == event.history_id) {
                continue;
            }
            let duplicated = sorted.iter().any(|s| {
                s.event.date_parts().0 == event.date_parts().0
                    && s.event.action_name == event.action_name
                    && s.event.action_text == event.action_text
                    && s.action.organization == top_level.canonical(&event.body_name)
            });
            prop_assert!(duplicated, "history row {} dropped without a twin", event.history_id);
        }
    }

    #[test]
    fn sorting_sorted_output_changes_nothing(events in history()) {
        let taxonomy = Taxonomy::builtin();
        let first = sort_actions(&events, &taxonomy, &top_level()).unwrap();
        let survivors: Vec<RawHistoryEvent> = first.iter().map(|s| s.event.clone()).collect();
        let second = sort_actions(&survivors, &taxonomy, &top_level()).unwrap();

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(a.event.history_id, b.event.history_id);
            prop_assert!(a.action.same_as(&b.action));
        }
    }

    #[test]
    fn top_level_body_always_gets_its_canonical_name(events in history()) {
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level()).unwrap();
        prop_assert!(sorted.iter().all(|s| s.action.organization != "CMAP Board"));
    }
}
