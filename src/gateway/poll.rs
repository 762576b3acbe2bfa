//! Presence-file poll loop body.

use super::Gateway;
use cortana_presence::Input;

impl Gateway {
    /// One tick: compare every tracked channel's presence file against the
    /// stored record and publish the topic when the button changed things.
    ///
    /// Iterates over a snapshot, so channels registered mid-tick are picked
    /// up on the next one.
    pub(super) async fn poll_tick(&mut self) {
        let now = chrono::Local::now().time();
        for (channel, _) in self.store.snapshot() {
            let present = self.presence.is_present(&channel);
            let input = Input::PollTick { present, now };
            if let Some(transition) = self.reconcile(&channel, input, "presence button") {
                if transition.resync.any() {
                    self.resync(&channel, &transition).await;
                }
            }
        }
    }
}
