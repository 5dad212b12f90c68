/*
 * Responsibility
 * - middleware の公開インターフェース
 * - 認証は Authorized<P> extractor 側 (route 単位で permission を宣言するため)
 */
pub mod http;
pub mod security_headers;
