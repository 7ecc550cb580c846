mod command;
mod curve;
mod device_info;
mod identity;
mod protocol;
mod status;

pub use command::{Command, OperationRequest};
pub use curve::{Curve, CurveError};
pub use device_info::DeviceInfo;
pub use identity::{GpgIdentity, Identity, IdentityError, IdentityUri, SshIdentity};
pub use protocol::Protocol;
pub use status::{StatusClass, StatusCode};
