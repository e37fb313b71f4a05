//! Reference data resolution: ids ↔ names for teachers, rooms, classes and
//! subjects.
//!
//! Listings are fetched whole and kept in a per-session [`ReferenceCache`]
//! for the configured TTL. Name lookups are plain scans over the listing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use untis_core::{ReferenceEntity, ReferenceKind};

use crate::context::CallContext;
use crate::error::RpcError;
use crate::session::Session;
use crate::wire::{EmptyParams, ReferenceRecord};

// ── Types ──────────────────────────────────────────────────────────

/// Outcome of resolving a list of ids to names.
///
/// `names` holds one entry per id that matched, in input order. Ids with no
/// record in the listing end up in `unresolved` instead, so
/// `names.len() + unresolved.len()` always equals the number of input ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedNames {
    pub names: Vec<String>,
    pub unresolved: Vec<i64>,
}

impl ResolvedNames {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

// ── Cache ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct CachedListing {
    fetched_at: Instant,
    records: Arc<[ReferenceEntity]>,
}

/// Reference listings by kind, each valid for `ttl` after it was fetched.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCache {
    ttl: Option<Duration>,
    entries: HashMap<ReferenceKind, CachedListing>,
}

impl ReferenceCache {
    /// `None` disables caching: every lookup misses.
    pub(crate) fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, kind: ReferenceKind, now: Instant) -> Option<Arc<[ReferenceEntity]>> {
        let ttl = self.ttl?;
        let entry = self.entries.get(&kind)?;
        (now.saturating_duration_since(entry.fetched_at) < ttl).then(|| Arc::clone(&entry.records))
    }

    pub(crate) fn insert(&mut self, kind: ReferenceKind, records: Arc<[ReferenceEntity]>, now: Instant) {
        if self.ttl.is_none() {
            return;
        }
        self.entries.insert(
            kind,
            CachedListing {
                fetched_at: now,
                records,
            },
        );
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

// ── Matching ───────────────────────────────────────────────────────

/// Map each id to the name of the first listing record carrying it.
fn match_names(listing: &[ReferenceEntity], ids: &[i64]) -> ResolvedNames {
    let mut resolved = ResolvedNames::default();
    for &id in ids {
        match listing.iter().find(|r| r.id == id) {
            Some(record) => resolved.names.push(record.name.clone()),
            None => resolved.unresolved.push(id),
        }
    }
    resolved
}

/// Find a teacher by `"<forename> <SURNAME>"`.
///
/// The input is split on its first space. The surname is compared
/// case-insensitively against the first token of the record's long name;
/// the forename must match exactly.
fn find_teacher_id(listing: &[ReferenceEntity], display_name: &str) -> Option<i64> {
    let (fore_name, surname) = display_name.split_once(' ')?;
    if fore_name.is_empty() || surname.is_empty() {
        return None;
    }
    let surname = surname.to_uppercase();
    listing
        .iter()
        .find(|r| {
            r.fore_name.as_deref() == Some(fore_name) && r.family_name().to_uppercase() == surname
        })
        .map(|r| r.id)
}

fn find_class_id(listing: &[ReferenceEntity], name: &str) -> Option<i64> {
    listing.iter().find(|r| r.name == name).map(|r| r.id)
}

// ── Session operations ─────────────────────────────────────────────

impl Session {
    /// Full listing for `kind`, from the cache when it is still fresh.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotAuthenticated`] before any network call, otherwise any
    /// transport or decode error.
    pub async fn reference_listing(
        &mut self,
        ctx: &CallContext,
        kind: ReferenceKind,
    ) -> Result<Arc<[ReferenceEntity]>, RpcError> {
        self.ensure_authenticated()?;

        if let Some(records) = self.references.get(kind, Instant::now()) {
            tracing::debug!(%kind, "reference listing served from cache");
            return Ok(records);
        }

        let raw: Vec<ReferenceRecord> = self.call(ctx, kind.method(), &EmptyParams {}).await?;
        let records: Arc<[ReferenceEntity]> =
            raw.into_iter().map(|r| r.into_entity(kind)).collect();
        tracing::debug!(%kind, count = records.len(), "fetched reference listing");

        self.references.insert(kind, Arc::clone(&records), Instant::now());
        Ok(records)
    }

    /// Resolve `ids` against the `kind` listing.
    ///
    /// An empty `ids` makes no network call. Unmatched ids are reported in
    /// [`ResolvedNames::unresolved`] and logged, not treated as errors.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotAuthenticated`] before any network call, otherwise any
    /// transport or decode error.
    pub async fn resolve_names(
        &mut self,
        ctx: &CallContext,
        kind: ReferenceKind,
        ids: &[i64],
    ) -> Result<ResolvedNames, RpcError> {
        self.ensure_authenticated()?;
        if ids.is_empty() {
            return Ok(ResolvedNames::default());
        }

        let listing = self.reference_listing(ctx, kind).await?;
        let resolved = match_names(&listing, ids);
        if !resolved.is_complete() {
            tracing::warn!(
                %kind,
                unresolved = ?resolved.unresolved,
                "ids missing from reference listing"
            );
        }
        Ok(resolved)
    }

    /// # Errors
    ///
    /// See [`Self::resolve_names`].
    pub async fn resolve_teacher_names(
        &mut self,
        ctx: &CallContext,
        ids: &[i64],
    ) -> Result<ResolvedNames, RpcError> {
        self.resolve_names(ctx, ReferenceKind::Teacher, ids).await
    }

    /// # Errors
    ///
    /// See [`Self::resolve_names`].
    pub async fn resolve_room_names(
        &mut self,
        ctx: &CallContext,
        ids: &[i64],
    ) -> Result<ResolvedNames, RpcError> {
        self.resolve_names(ctx, ReferenceKind::Room, ids).await
    }

    /// # Errors
    ///
    /// See [`Self::resolve_names`].
    pub async fn resolve_class_names(
        &mut self,
        ctx: &CallContext,
        ids: &[i64],
    ) -> Result<ResolvedNames, RpcError> {
        self.resolve_names(ctx, ReferenceKind::Class, ids).await
    }

    /// # Errors
    ///
    /// See [`Self::resolve_names`].
    pub async fn resolve_subject_names(
        &mut self,
        ctx: &CallContext,
        ids: &[i64],
    ) -> Result<ResolvedNames, RpcError> {
        self.resolve_names(ctx, ReferenceKind::Subject, ids).await
    }

    /// Teacher id for a `"<forename> <SURNAME>"` display name.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotFound`] if no teacher matches or the name has no
    /// space-separated forename and surname, plus the errors of
    /// [`Self::reference_listing`].
    pub async fn resolve_teacher_id(
        &mut self,
        ctx: &CallContext,
        display_name: &str,
    ) -> Result<i64, RpcError> {
        let listing = self.reference_listing(ctx, ReferenceKind::Teacher).await?;
        find_teacher_id(&listing, display_name).ok_or_else(|| RpcError::NotFound {
            kind: ReferenceKind::Teacher,
            name: display_name.to_owned(),
        })
    }

    /// Class id for an exact short name such as `5AHIF`.
    ///
    /// # Errors
    ///
    /// [`RpcError::NotFound`] if no class carries that name, plus the errors
    /// of [`Self::reference_listing`].
    pub async fn resolve_class_id(
        &mut self,
        ctx: &CallContext,
        name: &str,
    ) -> Result<i64, RpcError> {
        let listing = self.reference_listing(ctx, ReferenceKind::Class).await?;
        find_class_id(&listing, name).ok_or_else(|| RpcError::NotFound {
            kind: ReferenceKind::Class,
            name: name.to_owned(),
        })
    }
}
