use redpnr_core::{CoreError, InstanceId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaceError>;

#[derive(Error, Debug)]
pub enum PlaceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Netlist has no cell instances to place")]
    EmptyNetlist,

    #[error("Cell instance '{0}' has no placement")]
    Unplaced(InstanceId),
}
