pub mod action_card;
pub mod dialog;
pub mod sidebar;
pub mod sync_results;
pub mod top_senders_chart;

pub use action_card::ActionCard;
pub use dialog::{ConfirmDialog, NoticeBanner};
pub use sidebar::Sidebar;
pub use sync_results::SyncResults;
pub use top_senders_chart::TopSendersChart;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}
