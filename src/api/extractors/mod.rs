/*!
 * Request extractors
 *
 * Public API:
 * - Authorized<P>: bearer token 検証 + permission P のチェックを通過した claims
 */

mod authorized;

pub use authorized::Authorized;
