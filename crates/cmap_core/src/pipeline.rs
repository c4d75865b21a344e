use tracing::info;

use crate::actions::TopLevelBody;
use crate::assembler::BillAssembler;
use crate::error::PipelineError;
use crate::raw::Matter;
use crate::schema::Jurisdiction;
use crate::sink::Sink;
use crate::source::LegislativeSource;
use crate::taxonomy::Taxonomy;
use crate::votes::VoteOptions;

/// Which matters a run covers.
#[derive(Debug, Clone, Default)]
pub enum Selection {
    #[default]
    All,
    /// Matters modified after a `YYYY-MM-DD` date.
    Since(String),
    Ids(Vec<i64>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub bills: usize,
    pub vote_events: usize,
}

pub struct Pipeline<'a> {
    pub jurisdiction: Jurisdiction,
    pub taxonomy: &'a Taxonomy,
    pub vote_options: &'a VoteOptions,
    pub top_level: TopLevelBody,
}

impl Pipeline<'_> {
    /// Emits the jurisdiction, then every selected matter's bill and vote
    /// events. The first matter that fails stops the run.
    pub fn run<S, K>(
        &self,
        source: &S,
        sink: &mut K,
        selection: &Selection,
    ) -> Result<RunSummary, PipelineError>
    where
        S: LegislativeSource + ?Sized,
        K: Sink + ?Sized,
    {
        sink.emit_jurisdiction(&self.jurisdiction)?;

        let matters: Vec<Matter> = match selection {
            Selection::All => source.matters(None)?,
            Selection::Since(since) => source.matters(Some(since.as_str()))?,
            Selection::Ids(ids) => ids
                .iter()
                .map(|id| source.matter(*id))
                .collect::<Result<_, _>>()?,
        };

        let assembler = BillAssembler::new(source, self.taxonomy, self.vote_options, &self.top_level);
        let mut summary = RunSummary::default();
        for matter in &matters {
            let assembled = assembler
                .assemble(matter)
                .map_err(|err| PipelineError::Matter {
                    matter_id: matter.id,
                    source: err,
                })?;

            sink.emit_bill(&assembled.bill)?;
            for vote_event in &assembled.vote_events {
                sink.emit_vote_event(vote_event)?;
            }

            info!(
                matter_id = matter.id,
                identifier = %assembled.bill.identifier,
                actions = assembled.bill.actions.len(),
                vote_events = assembled.vote_events.len(),
                "assembled bill"
            );
            summary.bills += 1;
            summary.vote_events += assembled.vote_events.len();
        }

        info!(bills = summary.bills, vote_events = summary.vote_events, "run complete");
        Ok(summary)
    }
}
