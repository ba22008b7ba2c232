//! # Graph Registration
//!
//! Publishes a graph in a process-wide object table so external diagnostic
//! tools can find and attach to it, and revokes the publication later.
//!
//! The table is reached through an injected [`ObjectTableProvider`] rather
//! than global state, so tests and embedders can supply their own.
//!
//! ## Lifecycle
//!
//! [`Registrar::register`] yields a [`RegistrationToken`]. The token is not
//! `Clone`. [`Registrar::unregister`] takes it out of its slot only once the
//! table has revoked it, so a failed revocation can be retried with the same
//! slot. The guard returned from [`Registrar::register_scoped`] holds such a
//! slot and revokes whatever is left in it when dropped.
//!
//! Every intermediate handle (object table, moniker) is released before
//! either call returns, whatever the outcome.

use crate::config::InspectorConfig;
use crate::error::{GraphError, InspectError, InspectResult};
use crate::graph::FilterGraph;
use scopeguard::ScopeGuard;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Registration policy flags passed to the object table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationFlags(u32);

impl RegistrationFlags {
  /// The table holds a strong reference that keeps the graph alive.
  pub const KEEP_ALIVE: RegistrationFlags = RegistrationFlags(0x1);
  /// Clients from any security context may look the graph up.
  pub const ALLOW_ANY_CLIENT: RegistrationFlags = RegistrationFlags(0x2);

  /// Builds flags from raw bits.
  pub const fn from_bits(bits: u32) -> Self {
    RegistrationFlags(bits)
  }

  /// Returns the raw bits.
  pub const fn bits(self) -> u32 {
    self.0
  }

  /// Returns `true` when every flag in `other` is set.
  pub const fn contains(self, other: RegistrationFlags) -> bool {
    self.0 & other.0 == other.0
  }
}

impl Default for RegistrationFlags {
  fn default() -> Self {
    RegistrationFlags::KEEP_ALIVE
  }
}

impl std::ops::BitOr for RegistrationFlags {
  type Output = RegistrationFlags;

  fn bitor(self, rhs: Self) -> Self::Output {
    RegistrationFlags(self.0 | rhs.0)
  }
}

/// Name under which a graph is published.
pub trait Moniker {
  /// Returns the full display name of the moniker.
  fn display_name(&self) -> String;

  /// Access to the concrete handle type.
  fn as_any(&self) -> &dyn Any;
}

/// Process-wide table of published objects.
pub trait ObjectTable {
  /// Publishes `object` under `moniker` and returns the table's cookie.
  fn register(
    &self,
    flags: RegistrationFlags,
    object: Rc<dyn FilterGraph>,
    moniker: &dyn Moniker,
  ) -> Result<u32, GraphError>;

  /// Withdraws the publication identified by `cookie`.
  fn revoke(&self, cookie: u32) -> Result<(), GraphError>;
}

/// Gives access to the object table and creates monikers.
pub trait ObjectTableProvider {
  /// Returns a handle to the process-wide object table.
  fn object_table(&self) -> Result<Box<dyn ObjectTable>, GraphError>;

  /// Creates an item moniker from a delimiter and an item name.
  fn item_moniker(&self, delimiter: &str, item: &str) -> Result<Box<dyn Moniker>, GraphError>;
}

/// Proof of a live registration.
#[must_use = "dropping a token leaves the graph registered"]
#[derive(PartialEq, Eq, Hash)]
pub struct RegistrationToken(u32);

impl RegistrationToken {
  /// The table's cookie for this registration.
  pub fn cookie(&self) -> u32 {
    self.0
  }
}

impl fmt::Debug for RegistrationToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "RegistrationToken({:#x})", self.0)
  }
}

/// Registration that is revoked when dropped.
///
/// Derefs to the token slot, so a failed revocation can be retried with
/// [`Registrar::unregister`] before the guard goes out of scope.
pub type ScopedRegistration<'a> =
  ScopeGuard<Option<RegistrationToken>, Box<dyn FnOnce(Option<RegistrationToken>) + 'a>>;

/// Publishes and revokes graph registrations.
pub struct Registrar<P> {
  provider: P,
  config: InspectorConfig,
}

impl<P: ObjectTableProvider> Registrar<P> {
  /// Creates a registrar with the default configuration.
  pub fn new(provider: P) -> Self {
    Self::with_config(provider, InspectorConfig::default())
  }

  /// Creates a registrar with an explicit configuration.
  pub fn with_config(provider: P, config: InspectorConfig) -> Self {
    Self { provider, config }
  }

  /// Returns the provider.
  pub fn provider(&self) -> &P {
    &self.provider
  }

  /// Builds the item name a graph is published under:
  /// `"{prefix} {identity:08x} pid {pid:08x}"`.
  pub fn moniker_item(&self, graph: &Rc<dyn FilterGraph>) -> String {
    let identity = Rc::as_ptr(graph) as *const () as usize;
    format!(
      "{} {:08x} pid {:08x}",
      self.config.moniker_prefix,
      identity,
      std::process::id()
    )
  }

  /// Publishes `graph` in the object table.
  ///
  /// # Errors
  ///
  /// Returns [`InspectError::Registration`] naming the step that failed:
  /// opening the table, creating the moniker, or registering.
  pub fn register(&self, graph: &Rc<dyn FilterGraph>) -> InspectResult<RegistrationToken> {
    let table = self
      .provider
      .object_table()
      .map_err(|source| registration_error("opening the object table", source))?;
    let item = self.moniker_item(graph);
    let moniker = self
      .provider
      .item_moniker(&self.config.moniker_delimiter, &item)
      .map_err(|source| registration_error("creating the moniker", source))?;
    let cookie = table
      .register(
        self.config.registration_flags,
        Rc::clone(graph),
        moniker.as_ref(),
      )
      .map_err(|source| registration_error("registering", source))?;

    debug!(moniker = %item, cookie, "graph registered");
    Ok(RegistrationToken(cookie))
  }

  /// Withdraws the registration held in `slot`.
  ///
  /// The token is taken out of `slot` only when the table revokes it.
  /// Returns `false`, leaving the token in place for a retry, if the slot is
  /// empty, the table could not be opened or it refused to revoke.
  pub fn unregister(&self, slot: &mut Option<RegistrationToken>) -> bool {
    let Some(cookie) = slot.as_ref().map(RegistrationToken::cookie) else {
      trace!("no registration to revoke");
      return false;
    };
    let table = match self.provider.object_table() {
      Ok(table) => table,
      Err(err) => {
        warn!(error = %err, cookie, "could not open object table to revoke registration");
        return false;
      }
    };
    match table.revoke(cookie) {
      Ok(()) => {
        *slot = None;
        debug!(cookie, "graph registration revoked");
        true
      }
      Err(err) => {
        warn!(error = %err, cookie, "could not revoke graph registration");
        false
      }
    }
  }

  /// Publishes `graph` and returns a guard that revokes the registration
  /// when dropped.
  ///
  /// Use [`ScopeGuard::into_inner`] to keep the registration past the guard.
  pub fn register_scoped(&self, graph: &Rc<dyn FilterGraph>) -> InspectResult<ScopedRegistration<'_>> {
    let token = self.register(graph)?;
    let revoke: Box<dyn FnOnce(Option<RegistrationToken>) + '_> = Box::new(move |mut slot| {
      if slot.is_some() && !self.unregister(&mut slot) {
        warn!(?slot, "scoped registration dropped while still published");
      }
    });
    Ok(scopeguard::guard(Some(token), revoke))
  }
}

fn registration_error(stage: &'static str, source: GraphError) -> InspectError {
  warn!(error = %source, stage, "graph registration failed");
  InspectError::Registration { stage, source }
}
