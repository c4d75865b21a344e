use std::cell::RefCell;

use cmap_core::actions::{TopLevelBody, sort_actions};
use cmap_core::raw::{
    Matter, RawAttachment, RawHistoryEvent, RawRelation, RawSponsor, RawText, RawTopic, RawVote,
};
use cmap_core::schema::VoteResult;
use cmap_core::votes::{VoteOptions, pair_votes};
use cmap_core::{LegislativeSource, SourceError, Taxonomy};
use proptest::prelude::*;

/// Serves the same ballots for every roll call and remembers which
/// history rows were asked for.
struct BallotBox {
    ballots: Vec<RawVote>,
    requests: RefCell<Vec<i64>>,
}

impl BallotBox {
    fn new() -> Self {
        Self {
            ballots: vec![
                RawVote {
                    value_name: Some("Aye".into()),
                    person_name: "Jane Doe".into(),
                },
                RawVote {
                    value_name: Some("Nay".into()),
                    person_name: "John Roe".into(),
                },
            ],
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl LegislativeSource for BallotBox {
    fn matters(&self, _since: Option<&str>) -> Result<Vec<Matter>, SourceError> {
        Ok(Vec::new())
    }

    fn matter(&self, matter_id: i64) -> Result<Matter, SourceError> {
        Err(SourceError::Status {
            status: 404,
            url: format!("/matters/{matter_id}"),
        })
    }

    fn history(&self, _matter_id: i64) -> Result<Vec<RawHistoryEvent>, SourceError> {
        Ok(Vec::new())
    }

    fn votes(&self, history_id: i64) -> Result<Vec<RawVote>, SourceError> {
        self.requests.borrow_mut().push(history_id);
        Ok(self.ballots.clone())
    }

    fn sponsors(&self, _matter_id: i64) -> Result<Vec<RawSponsor>, SourceError> {
        Ok(Vec::new())
    }

    fn topics(&self, _matter_id: i64) -> Result<Vec<RawTopic>, SourceError> {
        Ok(Vec::new())
    }

    fn attachments(&self, _matter_id: i64) -> Result<Vec<RawAttachment>, SourceError> {
        Ok(Vec::new())
    }

    fn relations(&self, _matter_id: i64) -> Result<Vec<RawRelation>, SourceError> {
        Ok(Vec::new())
    }

    fn texts(&self, _matter_id: i64) -> Result<Vec<RawText>, SourceError> {
        Ok(Vec::new())
    }

    fn web_url(&self, matter: &Matter) -> String {
        format!("https://cmap.example/{}", matter.id)
    }

    fn api_url(&self, matter_id: i64) -> String {
        format!("https://api.example/matters/{matter_id}")
    }
}

fn roll_call(
    event_id: Option<i64>,
    roll_call_flag: Option<bool>,
    passed_flag: Option<bool>,
    motion_text: Option<String>,
) -> RawHistoryEvent {
    RawHistoryEvent {
        history_id: 42,
        action_date: "2023-01-10T10:00:00".into(),
        action_name: "approved".into(),
        action_text: motion_text,
        body_name: "CMAP Board".into(),
        event_id,
        roll_call_flag,
        passed_flag,
    }
}

fn top_level() -> TopLevelBody {
    TopLevelBody {
        body: "CMAP Board".into(),
        organization: "CMAP Board of Directors".into(),
    }
}

/// "voice vote" with every letter independently upper- or lower-cased.
fn voice_vote_casing() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<bool>(), "voice vote".len()).prop_map(|upper| {
        "voice vote"
            .chars()
            .zip(upper)
            .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

fn incomplete_flags() -> impl Strategy<Value = (Option<i64>, Option<bool>, Option<bool>)> {
    (
        prop::option::of(1..10_000i64),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_filter("at least one flag missing", |(event_id, roll_call, passed)| {
            event_id.is_none() || roll_call.is_none() || passed.is_none()
        })
}

proptest! {
    #[test]
    fn missing_flag_means_no_vote(
        (event_id, roll_call_flag, passed_flag) in incomplete_flags(),
        motion_text in prop::option::of("[a-zA-Z ]{0,24}"),
    ) {
        let events = [roll_call(event_id, roll_call_flag, passed_flag, motion_text)];
        let source = BallotBox::new();
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level()).unwrap();

        let paired = pair_votes(sorted, &source, &VoteOptions::default(), 7).unwrap();
        prop_assert_eq!(paired.len(), 1);
        prop_assert_eq!(paired[0].tally.result, None);
        prop_assert!(paired[0].tally.ballots.is_empty());
        prop_assert!(source.requests.borrow().is_empty());
    }

    #[test]
    fn voice_vote_in_any_casing_keeps_result_but_no_ballots(
        prefix in "[a-z ]{0,12}",
        casing in voice_vote_casing(),
        suffix in "[a-z ]{0,12}",
        passed in any::<bool>(),
    ) {
        let motion_text = format!("{prefix}{casing}{suffix}");
        let events = [roll_call(Some(900), Some(true), Some(passed), Some(motion_text))];
        let source = BallotBox::new();
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level()).unwrap();

        let paired = pair_votes(sorted, &source, &VoteOptions::default(), 7).unwrap();
        prop_assert_eq!(paired[0].tally.result, Some(VoteResult::from_passed(passed)));
        prop_assert!(paired[0].tally.ballots.is_empty());
        prop_assert!(source.requests.borrow().is_empty());
    }

    #[test]
    fn roll_call_fetches_ballots(
        motion_text in prop::option::of("[a-z ]{0,24}")
            .prop_filter("not a voice vote", |text| {
                !text.as_deref().is_some_and(|text| text.contains("voice vote"))
            }),
        passed in any::<bool>(),
    ) {
        let events = [roll_call(Some(900), Some(true), Some(passed), motion_text)];
        let source = BallotBox::new();
        let sorted = sort_actions(&events, &Taxonomy::builtin(), &top_level()).unwrap();

        let paired = pair_votes(sorted, &source, &VoteOptions::default(), 7).unwrap();
        prop_assert_eq!(paired[0].tally.result, Some(VoteResult::from_passed(passed)));
        prop_assert_eq!(paired[0].tally.ballots.len(), 2);
        prop_assert_eq!(source.requests.borrow().clone(), vec![42]);
    }
}
