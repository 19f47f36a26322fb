/*! Integration tests for Teamdesk.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - auth: login, logout, registration, and forced password-reset flows
 * - ledger: event append semantics, actor resolution, and the cap
 * - directory: user CRUD, grouping, and the group filter
 * - analytics: dashboard/explorer aggregations and the polling watcher
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("teamdesk=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod analytics;
mod auth;
mod directory;
mod helpers;
mod ledger;
