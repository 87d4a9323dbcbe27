//! Backend object bindings for pens, brushes and fonts.
//!
//! A drawing resource does not own a backend object. It remembers which
//! surface created one for it, at which device size, through a
//! [`BindingSlot`]. Changing a property of the resource invalidates the
//! slot; the stale handle is handed back for release the next time the
//! same surface binds the resource, and surfaces release whatever they
//! still own when they are disposed.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::basics::{is_equal_eps, FLOAT_EPSILON};
use crate::error::Result;

/// Opaque handle to an object created by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(pub u64);

/// Identity of a drawing surface. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SurfaceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub owner: SurfaceId,
    pub handle: ObjectHandle,
    /// Device size the object was created for (pen width or font height in
    /// pixels; zero for brushes).
    pub device_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Binding {
    #[default]
    Unbound,
    BoundTo(Bound),
}

/// What [`BindingSlot::bind`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Reused(ObjectHandle),
    Created(ObjectHandle),
}

impl BindOutcome {
    pub fn handle(self) -> ObjectHandle {
        match self {
            BindOutcome::Reused(h) | BindOutcome::Created(h) => h,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BindingSlot {
    binding: Binding,
    retired: Vec<(SurfaceId, ObjectHandle)>,
}

impl BindingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::BoundTo(_))
    }

    /// Forget the current binding. Its handle is released on the next bind
    /// by the surface that created it.
    pub fn invalidate(&mut self) {
        if let Binding::BoundTo(b) = std::mem::take(&mut self.binding) {
            self.retired.push((b.owner, b.handle));
        }
    }

    /// Return a handle valid on `owner` at `device_size`, creating one with
    /// `create` when the current binding does not fit. Handles that `owner`
    /// created and that are no longer needed are appended to `stale`.
    /// Retired handles of other surfaces are dropped; those surfaces release
    /// them when disposed.
    pub fn bind<F>(
        &mut self,
        owner: SurfaceId,
        device_size: f32,
        stale: &mut Vec<ObjectHandle>,
        create: F,
    ) -> Result<BindOutcome>
    where
        F: FnOnce() -> Result<ObjectHandle>,
    {
        for (o, h) in self.retired.drain(..) {
            if o == owner {
                stale.push(h);
            }
        }

        if let Binding::BoundTo(b) = self.binding {
            if b.owner == owner {
                if is_equal_eps(b.device_size, device_size, FLOAT_EPSILON) {
                    return Ok(BindOutcome::Reused(b.handle));
                }
                stale.push(b.handle);
            }
            self.binding = Binding::Unbound;
        }

        let handle = create()?;
        self.binding = Binding::BoundTo(Bound {
            owner,
            handle,
            device_size,
        });
        Ok(BindOutcome::Created(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn counter() -> impl FnMut() -> Result<ObjectHandle> {
        let mut n = 0;
        move || {
            n += 1;
            Ok(ObjectHandle(n))
        }
    }

    #[test]
    fn test_bind_reuses_matching_binding() {
        let owner = SurfaceId::next();
        let mut slot = BindingSlot::new();
        let mut make = counter();
        let mut stale = Vec::new();
        let first = slot.bind(owner, 1.0, &mut stale, &mut make).unwrap();
        assert_eq!(first, BindOutcome::Created(ObjectHandle(1)));
        let second = slot.bind(owner, 1.0, &mut stale, &mut make).unwrap();
        assert_eq!(second, BindOutcome::Reused(ObjectHandle(1)));
        assert!(stale.is_empty());
    }

    #[test]
    fn test_size_change_releases_old_handle() {
        let owner = SurfaceId::next();
        let mut slot = BindingSlot::new();
        let mut make = counter();
        let mut stale = Vec::new();
        slot.bind(owner, 1.0, &mut stale, &mut make).unwrap();
        let out = slot.bind(owner, 2.0, &mut stale, &mut make).unwrap();
        assert_eq!(out, BindOutcome::Created(ObjectHandle(2)));
        assert_eq!(stale, vec![ObjectHandle(1)]);
    }

    #[test]
    fn test_invalidate_retires_handle_for_owner() {
        let a = SurfaceId::next();
        let b = SurfaceId::next();
        let mut slot = BindingSlot::new();
        let mut make = counter();
        let mut stale = Vec::new();
        slot.bind(a, 1.0, &mut stale, &mut make).unwrap();
        slot.invalidate();
        assert!(!slot.is_bound());

        // Another surface binding does not release a's handle.
        slot.bind(b, 1.0, &mut stale, &mut make).unwrap();
        assert!(stale.is_empty());

        slot.invalidate();
        slot.bind(b, 1.0, &mut stale, &mut make).unwrap();
        assert_eq!(stale, vec![ObjectHandle(2)]);
    }

    #[test]
    fn test_switching_owner_drops_foreign_binding() {
        let a = SurfaceId::next();
        let b = SurfaceId::next();
        let mut slot = BindingSlot::new();
        let mut make = counter();
        let mut stale = Vec::new();
        slot.bind(a, 1.0, &mut stale, &mut make).unwrap();
        let out = slot.bind(b, 1.0, &mut stale, &mut make).unwrap();
        assert_eq!(out, BindOutcome::Created(ObjectHandle(2)));
        assert!(stale.is_empty());
        match slot.binding() {
            Binding::BoundTo(bound) => assert_eq!(bound.owner, b),
            Binding::Unbound => panic!("expected a binding"),
        }
    }

    #[test]
    fn test_create_failure_leaves_slot_unbound() {
        let owner = SurfaceId::next();
        let mut slot = BindingSlot::new();
        let mut stale = Vec::new();
        let err = slot
            .bind(owner, 1.0, &mut stale, || Err(Error::InvalidArgument("no".into())))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!slot.is_bound());
    }
}
