use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A report needs to pick a random row from a table that has none.
    #[error("cannot pick a random row: table `{0}` is empty")]
    EmptyTable(&'static str),

    #[error(transparent)]
    Db(#[from] DbErr),
}
