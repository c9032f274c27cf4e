/*
 * Responsibility
 * - middleware / handler から使うドメインサービス
 * - auth: access token の検証器と鍵
 */
pub mod auth;
