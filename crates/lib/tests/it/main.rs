/*! Integration tests for Arbor.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure follows the layers of the library:
 * - arithmetic: increment/decrement over nested values and nodes
 * - position: resolve, assign and erase across node boundaries
 * - linkage: parent links, sibling caches, removal and replacement
 * - traversal: traversal iterators and their agreement with path arithmetic
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("arbor=info".parse().unwrap()))
        .with_test_writer()
        .try_init();
}

mod arithmetic;
mod helpers;
mod position;
mod traversal;
