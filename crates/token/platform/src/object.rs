use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::{PlatformError, Rejected};
use crate::ids::{Address, ObjectId};

/// Anything the platform can own, transfer, or share.
pub trait Object: Send + 'static {
    fn id(&self) -> &ObjectId;
}

fn acquire<V>(mutex: &Mutex<V>) -> Result<MutexGuard<'_, V>, PlatformError> {
    mutex.lock().map_err(|_| PlatformError::LockPoisoned)
}

/// A published, concurrently reachable object.
///
/// Every access runs inside one critical section, so callers never observe
/// another caller's half-applied mutation. Handles are cheap to clone and
/// all point at the same object.
pub struct Shared<O> {
    id: ObjectId,
    inner: Arc<Mutex<O>>,
}

impl<O: Object> Shared<O> {
    pub(crate) fn publish(object: O) -> Self {
        Self {
            id: *object.id(),
            inner: Arc::new(Mutex::new(object)),
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Read the object.
    pub fn with<R>(&self, f: impl FnOnce(&O) -> R) -> Result<R, PlatformError> {
        let guard = acquire(&self.inner)?;
        Ok(f(&guard))
    }

    /// Mutate the object.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut O) -> R) -> Result<R, PlatformError> {
        let mut guard = acquire(&self.inner)?;
        Ok(f(&mut guard))
    }

    /// Mutate the object with a fallible operation, flattening errors.
    pub fn try_with_mut<R, E>(&self, f: impl FnOnce(&mut O) -> Result<R, E>) -> Result<R, E>
    where
        E: From<PlatformError>,
    {
        let mut guard = acquire(&self.inner)?;
        f(&mut guard)
    }
}

impl<O> Clone for Shared<O> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O> fmt::Debug for Shared<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shared")
            .field("id", &self.id)
            .field("type", &std::any::type_name::<O>())
            .finish()
    }
}

struct OwnedEntry {
    owner: Address,
    object: Box<dyn Any + Send>,
}

/// The platform's object table: single-owner objects keyed by id, published
/// shared objects, and the set of registered currencies.
#[derive(Default)]
pub struct ObjectStore {
    owned: Mutex<HashMap<ObjectId, OwnedEntry>>,
    shared: Mutex<HashMap<ObjectId, Box<dyn Any + Send + Sync>>>,
    currencies: Mutex<HashSet<TypeId>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `object` to `recipient`. The previous holder loses it by move.
    pub fn transfer<O: Object>(&self, object: O, recipient: Address) -> Result<(), PlatformError> {
        self.try_transfer(object, recipient)
            .map_err(|rejected| rejected.error)
    }

    /// [`transfer`](Self::transfer), handing `object` back if the store
    /// refuses it.
    pub fn try_transfer<O: Object>(
        &self,
        object: O,
        recipient: Address,
    ) -> Result<(), Rejected<O, PlatformError>> {
        let id = *object.id();
        let mut owned = match acquire(&self.owned) {
            Ok(owned) => owned,
            Err(error) => return Err(Rejected::new(error, object)),
        };
        if owned.contains_key(&id) {
            return Err(Rejected::new(PlatformError::DuplicateObject(id), object));
        }
        owned.insert(
            id,
            OwnedEntry {
                owner: recipient,
                object: Box::new(object),
            },
        );
        debug!(
            object = %id,
            kind = std::any::type_name::<O>(),
            recipient = %recipient.short_id(),
            "Object transferred"
        );
        Ok(())
    }

    /// Withdraw an object owned by `owner`.
    ///
    /// Ownership and type are checked before anything is removed. Reached
    /// through [`TxContext::take`](crate::TxContext::take), which claims the
    /// transaction sender as owner.
    pub(crate) fn take<O: Object>(&self, owner: &Address, id: &ObjectId) -> Result<O, PlatformError> {
        let mut owned = acquire(&self.owned)?;
        let entry = owned
            .get(id)
            .ok_or(PlatformError::ObjectNotFound(*id))?;
        if entry.owner != *owner {
            return Err(PlatformError::NotOwner {
                id: *id,
                claimed: *owner,
            });
        }
        if !entry.object.is::<O>() {
            return Err(PlatformError::TypeMismatch {
                id: *id,
                expected: std::any::type_name::<O>(),
            });
        }
        let entry = owned
            .remove(id)
            .ok_or(PlatformError::ObjectNotFound(*id))?;
        entry
            .object
            .downcast::<O>()
            .map(|boxed| *boxed)
            .map_err(|_| PlatformError::TypeMismatch {
                id: *id,
                expected: std::any::type_name::<O>(),
            })
    }

    pub fn owner_of(&self, id: &ObjectId) -> Result<Option<Address>, PlatformError> {
        let owned = acquire(&self.owned)?;
        Ok(owned.get(id).map(|entry| entry.owner))
    }

    /// Ids of every `O` owned by `owner`, in id order.
    pub fn owned_by<O: Object>(&self, owner: &Address) -> Result<Vec<ObjectId>, PlatformError> {
        let owned = acquire(&self.owned)?;
        let mut ids: Vec<ObjectId> = owned
            .iter()
            .filter(|(_, entry)| entry.owner == *owner && entry.object.is::<O>())
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Publish `object` as a shared object and return a handle to it.
    pub fn share<O: Object>(&self, object: O) -> Result<Shared<O>, PlatformError> {
        let handle = Shared::publish(object);
        let mut shared = acquire(&self.shared)?;
        if shared.contains_key(handle.id()) {
            return Err(PlatformError::DuplicateObject(*handle.id()));
        }
        shared.insert(*handle.id(), Box::new(handle.clone()));
        debug!(
            object = %handle.id(),
            kind = std::any::type_name::<O>(),
            "Object shared"
        );
        Ok(handle)
    }

    /// Record currency `T` as registered. Each currency registers once.
    pub(crate) fn register_currency<T: 'static>(&self) -> Result<(), PlatformError> {
        let mut currencies = acquire(&self.currencies)?;
        if !currencies.insert(TypeId::of::<T>()) {
            return Err(PlatformError::DuplicateCurrency(std::any::type_name::<T>()));
        }
        Ok(())
    }

    /// Look up a published object by id.
    pub fn shared<O: Object>(&self, id: &ObjectId) -> Result<Shared<O>, PlatformError> {
        let shared = acquire(&self.shared)?;
        let entry = shared.get(id).ok_or(PlatformError::ObjectNotFound(*id))?;
        entry
            .downcast_ref::<Shared<O>>()
            .cloned()
            .ok_or(PlatformError::TypeMismatch {
                id: *id,
                expected: std::any::type_name::<O>(),
            })
    }
}

impl fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ticket {
        id: ObjectId,
        seat: u32,
    }

    impl Object for Ticket {
        fn id(&self) -> &ObjectId {
            &self.id
        }
    }

    #[derive(Debug)]
    struct Badge {
        id: ObjectId,
    }

    impl Object for Badge {
        fn id(&self) -> &ObjectId {
            &self.id
        }
    }

    fn ticket(n: u128) -> Ticket {
        Ticket {
            id: ObjectId::from_u128(n),
            seat: n as u32,
        }
    }

    #[test]
    fn transfer_and_take() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        store.transfer(ticket(1), alice).unwrap();

        assert_eq!(store.owner_of(&ObjectId::from_u128(1)).unwrap(), Some(alice));
        let t: Ticket = store.take(&alice, &ObjectId::from_u128(1)).unwrap();
        assert_eq!(t.seat, 1);
        assert_eq!(store.owner_of(&ObjectId::from_u128(1)).unwrap(), None);
    }

    #[test]
    fn take_by_non_owner_fails_and_keeps_object() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        let mallory = Address::derive("mallory");
        store.transfer(ticket(1), alice).unwrap();

        let err = store
            .take::<Ticket>(&mallory, &ObjectId::from_u128(1))
            .unwrap_err();
        assert!(matches!(err, PlatformError::NotOwner { .. }));
        assert_eq!(store.owner_of(&ObjectId::from_u128(1)).unwrap(), Some(alice));
    }

    #[test]
    fn take_with_wrong_type_fails_and_keeps_object() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        store.transfer(ticket(1), alice).unwrap();

        let err = store
            .take::<Badge>(&alice, &ObjectId::from_u128(1))
            .unwrap_err();
        assert!(matches!(err, PlatformError::TypeMismatch { .. }));
        assert!(store.take::<Ticket>(&alice, &ObjectId::from_u128(1)).is_ok());
    }

    #[test]
    fn owned_by_filters_owner_and_type() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        let bob = Address::derive("bob");
        store.transfer(ticket(2), alice).unwrap();
        store.transfer(ticket(1), alice).unwrap();
        store.transfer(ticket(3), bob).unwrap();
        store
            .transfer(
                Badge {
                    id: ObjectId::from_u128(4),
                },
                alice,
            )
            .unwrap();

        assert_eq!(
            store.owned_by::<Ticket>(&alice).unwrap(),
            vec![ObjectId::from_u128(1), ObjectId::from_u128(2)]
        );
        assert_eq!(store.owned_by::<Badge>(&alice).unwrap().len(), 1);
        assert!(store.owned_by::<Badge>(&bob).unwrap().is_empty());
    }

    #[test]
    fn shared_handles_see_the_same_object() {
        let store = ObjectStore::new();
        let handle = store.share(ticket(9)).unwrap();
        handle.with_mut(|t| t.seat = 42).unwrap();

        let again: Shared<Ticket> = store.shared(&ObjectId::from_u128(9)).unwrap();
        assert_eq!(again.with(|t| t.seat).unwrap(), 42);
        assert!(matches!(
            store.shared::<Badge>(&ObjectId::from_u128(9)),
            Err(PlatformError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn duplicate_transfer_is_rejected() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        store.transfer(ticket(1), alice).unwrap();
        assert!(matches!(
            store.transfer(ticket(1), alice),
            Err(PlatformError::DuplicateObject(_))
        ));
    }

    #[test]
    fn refused_transfer_hands_object_back() {
        let store = ObjectStore::new();
        let alice = Address::derive("alice");
        store.transfer(ticket(1), alice).unwrap();

        let rejected = store.try_transfer(ticket(1), alice).unwrap_err();
        assert!(matches!(rejected.error, PlatformError::DuplicateObject(_)));
        assert_eq!(rejected.into_value().seat, 1);
    }

    #[test]
    fn currency_registers_once() {
        struct Gold;
        struct Silver;

        let store = ObjectStore::new();
        store.register_currency::<Gold>().unwrap();
        store.register_currency::<Silver>().unwrap();
        assert!(matches!(
            store.register_currency::<Gold>(),
            Err(PlatformError::DuplicateCurrency(_))
        ));
    }
}
