use divvy_application::ExpenseIssue;
use divvy_domain::{Money, ParticipantBalances, Settlement, SettlementContext, Transfer};
use std::fmt::Write as _;

const DISPLAY_DP: u32 = 2;

/// Plain-text rendering of ledger results. Amounts are rounded for display only.
pub struct ReportPresenter;

impl ReportPresenter {
    pub fn render(result: &Settlement, context: &SettlementContext) -> String {
        let mut reply = String::with_capacity(512);
        reply.push_str(&Self::render_balances(&result.balances));
        reply.push('\n');
        reply.push_str(&Self::render_transfers(&result.transfers));

        let open: ParticipantBalances = result
            .remaining
            .iter()
            .filter(|(_, balance)| !context.is_settled(**balance))
            .map(|(id, balance)| (id.clone(), *balance))
            .collect();
        if !open.is_empty() {
            reply.push('\n');
            reply.push_str("Unbalanced after settlement:\n");
            for (id, balance) in &open {
                let _ = writeln!(&mut reply, "  {id}: {}", signed(*balance));
            }
        }

        reply
    }

    pub fn render_balances(balances: &ParticipantBalances) -> String {
        let mut reply = String::from("Balances:\n");
        if balances.is_empty() {
            reply.push_str("  (no participants)\n");
            return reply;
        }

        let width = balances
            .keys()
            .map(|id| id.as_str().chars().count())
            .max()
            .unwrap_or(0);
        for (id, balance) in balances {
            let _ = writeln!(&mut reply, "  {:<width$}  {}", id.as_str(), signed(*balance));
        }
        reply
    }

    pub fn render_transfers(transfers: &[Transfer]) -> String {
        let mut reply = String::from("Settlements:\n");
        if transfers.is_empty() {
            reply.push_str("  All settled up.\n");
            return reply;
        }

        for transfer in transfers {
            let _ = writeln!(
                &mut reply,
                "  {} -> {}: {:.2}",
                transfer.from,
                transfer.to,
                transfer.amount.round_dp(DISPLAY_DP)
            );
        }
        reply
    }

    pub fn render_issues(issues: &[ExpenseIssue]) -> String {
        let mut reply = String::from("Findings:\n");
        if issues.is_empty() {
            reply.push_str("  No issues found.\n");
            return reply;
        }

        for issue in issues {
            let _ = writeln!(&mut reply, "  expense #{}: {}", issue.index, issue.kind);
        }
        reply
    }
}

fn signed(amount: Money) -> String {
    let rounded = amount.round_dp(DISPLAY_DP);
    if rounded.is_positive() {
        format!("+{rounded:.2}")
    } else if rounded.is_zero() {
        // Tiny negative residues would otherwise print as "-0.00".
        "0.00".to_owned()
    } else {
        format!("{rounded:.2}")
    }
}
