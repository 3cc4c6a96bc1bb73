//! Operation-table entrypoint.
//!
//! The host drives the core through one call: an operation code plus a
//! parameter record for that operation. The core reads the record's inputs,
//! fills its outputs and answers with a status: 0 on success, negative on
//! failure with the error out-parameter set to `"ERROR"`.

use emu_core::Host;
use thiserror::Error;

use crate::config::{PbnConfig, Setting};
use crate::info::{self, ControllerConfig, CoreInfo, RegionInfo, SysregionInfo, TypeInfo};
use crate::pbn::{AvState, Pbn, Scale};
use crate::state::StateError;

pub const STATUS_OK: i32 = 0;
pub const STATUS_ERROR: i32 = -1;
/// The only error text the entrypoint reports.
pub const ERROR_MESSAGE: &str = "ERROR";

/// Operation codes understood by `Plugin::entrypoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    EnumerateCores = 0,
    CoreInfo = 1,
    TypeInfo = 2,
    RegionInfo = 3,
    SysregionInfo = 4,
    AvState = 5,
    Emulate = 6,
    SaveState = 7,
    LoadState = 8,
    ControllerConfig = 9,
    LoadRom = 10,
    ComputeScale = 11,
}

impl Operation {
    #[must_use]
    pub const fn code(self) -> u32 {
        self as u32
    }

    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::EnumerateCores,
            1 => Self::CoreInfo,
            2 => Self::TypeInfo,
            3 => Self::RegionInfo,
            4 => Self::SysregionInfo,
            5 => Self::AvState,
            6 => Self::Emulate,
            7 => Self::SaveState,
            8 => Self::LoadState,
            9 => Self::ControllerConfig,
            10 => Self::LoadRom,
            11 => Self::ComputeScale,
            _ => return None,
        })
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("no host capabilities registered; enumerate the core first")]
    NoHost,
    #[error("unknown operation code {0}")]
    UnknownOperation(u32),
    #[error("{operation:?} called with {params:?} parameters")]
    ParamsMismatch {
        operation: Operation,
        params: Operation,
    },
}

/// Parameter record for one operation. Fields named `out` (or holding an
/// `Option`) are filled by the core; the rest are inputs.
#[derive(Debug)]
pub enum Params<'a, H> {
    EnumerateCores {
        /// Capabilities handed to the core. Taken on success.
        host: Option<H>,
        sysregions: Option<&'static [u32]>,
    },
    CoreInfo {
        out: Option<CoreInfo>,
    },
    TypeInfo {
        out: Option<TypeInfo>,
    },
    RegionInfo {
        out: Option<RegionInfo>,
    },
    SysregionInfo {
        out: Option<SysregionInfo>,
    },
    AvState {
        out: Option<AvState>,
    },
    Emulate {
        /// Points the driver submitted this frame.
        points: Option<u32>,
    },
    SaveState {
        /// Receives a copy of the state; previous contents are replaced.
        data: Vec<u8>,
    },
    LoadState {
        data: &'a [u8],
    },
    ControllerConfig {
        out: Option<ControllerConfig>,
    },
    LoadRom {
        /// Contents of the `pbn` image. Only its presence matters.
        image: &'a [u8],
        settings: &'a [Setting],
    },
    ComputeScale {
        out: Option<Scale>,
    },
}

impl<H> Params<'_, H> {
    /// The operation this record belongs to.
    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Self::EnumerateCores { .. } => Operation::EnumerateCores,
            Self::CoreInfo { .. } => Operation::CoreInfo,
            Self::TypeInfo { .. } => Operation::TypeInfo,
            Self::RegionInfo { .. } => Operation::RegionInfo,
            Self::SysregionInfo { .. } => Operation::SysregionInfo,
            Self::AvState { .. } => Operation::AvState,
            Self::Emulate { .. } => Operation::Emulate,
            Self::SaveState { .. } => Operation::SaveState,
            Self::LoadState { .. } => Operation::LoadState,
            Self::ControllerConfig { .. } => Operation::ControllerConfig,
            Self::LoadRom { .. } => Operation::LoadRom,
            Self::ComputeScale { .. } => Operation::ComputeScale,
        }
    }
}

/// One loaded instance of the core together with the host it reports to.
#[derive(Debug)]
pub struct Plugin<H> {
    core: Pbn,
    host: Option<H>,
    paint_limit: Option<u32>,
}

impl<H: Host> Plugin<H> {
    /// A plugin with no host yet and a default 64×56 canvas.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: Pbn::default(),
            host: None,
            paint_limit: None,
        }
    }

    /// Cap the points painted per frame, now and for every later load.
    #[must_use]
    pub fn with_paint_limit(mut self, limit: Option<u32>) -> Self {
        self.paint_limit = limit;
        self.core.set_paint_limit(limit);
        self
    }

    /// Run one operation, ABI style.
    ///
    /// Returns `STATUS_OK`, or `STATUS_ERROR` with `error` set to
    /// `ERROR_MESSAGE`. A failed operation changes nothing.
    pub fn entrypoint(
        &mut self,
        action: u32,
        params: &mut Params<'_, H>,
        error: &mut Option<&'static str>,
    ) -> i32 {
        match self.dispatch(action, params) {
            Ok(()) => STATUS_OK,
            Err(e) => {
                log::debug!("operation {action} failed: {e}");
                *error = Some(ERROR_MESSAGE);
                STATUS_ERROR
            }
        }
    }

    /// Run one operation.
    ///
    /// # Errors
    ///
    /// Fails on an unknown code, a record that belongs to another
    /// operation, `Emulate` before a host is registered, or a load-state
    /// of the wrong size.
    pub fn dispatch(&mut self, action: u32, params: &mut Params<'_, H>) -> Result<(), CoreError> {
        let operation = Operation::from_code(action).ok_or(CoreError::UnknownOperation(action))?;
        if params.operation() != operation {
            return Err(CoreError::ParamsMismatch {
                operation,
                params: params.operation(),
            });
        }

        match params {
            Params::EnumerateCores { host, sysregions } => {
                if let Some(host) = host.take() {
                    if self.host.replace(host).is_some() {
                        log::warn!("host capabilities registered again; replacing previous set");
                    }
                }
                *sysregions = Some(info::SYSREGIONS);
            }
            Params::CoreInfo { out } => *out = Some(info::core_info()),
            Params::TypeInfo { out } => *out = Some(info::type_info()),
            Params::RegionInfo { out } => *out = Some(info::region_info()),
            Params::SysregionInfo { out } => *out = Some(info::sysregion_info()),
            Params::AvState { out } => *out = Some(self.core.av_state()),
            Params::Emulate { points } => {
                let host = self.host.as_mut().ok_or(CoreError::NoHost)?;
                *points = Some(self.core.emulate(host));
            }
            Params::SaveState { data } => {
                data.clear();
                data.extend_from_slice(self.core.save_state());
            }
            Params::LoadState { data } => self.core.load_state(*data)?,
            Params::ControllerConfig { out } => *out = Some(info::controller_config()),
            Params::LoadRom { image, settings } => {
                log::debug!("loading {}-byte image with {} settings", image.len(), settings.len());
                let config = PbnConfig {
                    paint_limit: self.paint_limit,
                    ..PbnConfig::from_settings(*settings)
                };
                self.core.load(&config);
            }
            Params::ComputeScale { out } => *out = Some(self.core.compute_scale()),
        }
        Ok(())
    }

    #[must_use]
    pub fn core(&self) -> &Pbn {
        &self.core
    }

    #[must_use]
    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }
}

impl<H: Host> Default for Plugin<H> {
    fn default() -> Self {
        Self::new()
    }
}
