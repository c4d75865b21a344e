use crate::actions::TopLevelBody;
use crate::votes::PairedAction;

const REFERRAL_ACTIONS: &[&str] = &["referred", "approved and referred"];

/// Yields each item with the one after it; the last item is paired with
/// `None`.
pub fn pairwise<T>(items: &[T]) -> impl Iterator<Item = (&T, Option<&T>)> {
    items
        .iter()
        .zip(items.iter().skip(1).map(Some).chain(std::iter::once(None)))
}

pub fn is_referral(description: &str) -> bool {
    REFERRAL_ACTIONS.contains(&description)
}

/// Points every referral at the body it went to: the organization of the
/// next action, or the matter's own body when the referral is the last
/// thing on record. Referrals back to the top-level body get no link.
pub fn link_referrals(
    actions: &mut [PairedAction],
    matter_body: Option<&str>,
    top_level: &TopLevelBody,
) {
    let targets: Vec<Option<String>> = pairwise(actions)
        .map(|(current, next)| {
            if !is_referral(&current.action.description) {
                return None;
            }
            let target = match next {
                Some(next) => Some(next.action.organization.as_str()),
                None => matter_body,
            }?;
            (!top_level.is_top_level(target)).then(|| target.to_string())
        })
        .collect();

    for (paired, target) in actions.iter_mut().zip(targets) {
        paired.action.related_organization = target;
    }
}
