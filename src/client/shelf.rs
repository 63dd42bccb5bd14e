use crate::resource::{Resource, ResourceId};

use super::{RequestError, ResourceClient};

/// Local list of records kept in step with the backend.
///
/// The list is advisory: it only ever changes to reflect a server-confirmed
/// record or a fresh fetch of the collection. A failed call leaves it as it
/// was.
pub struct Shelf<R: Resource> {
    client: ResourceClient<R>,
    items: Vec<R::Record>,
}

impl<R: Resource> Shelf<R> {
    /// An empty shelf; call [`Shelf::refresh`] to load it.
    pub fn new(client: ResourceClient<R>) -> Self {
        Self {
            client,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn find(&self, id: ResourceId) -> Option<&R::Record> {
        self.items.iter().find(|record| R::id_of(record) == id)
    }

    /// Replace the list with the collection as the backend has it now.
    pub async fn refresh(&mut self) -> Result<&[R::Record], RequestError> {
        self.items = self.client.list().await?;
        tracing::debug!(
            resource = R::COLLECTION,
            count = self.items.len(),
            "shelf refreshed"
        );
        Ok(&self.items)
    }

    /// Create a record and append the backend's copy of it.
    pub async fn add(&mut self, fields: &R::Fields) -> Result<R::Record, RequestError> {
        let created = self.client.create(fields).await?;
        self.items.push(created.clone());
        Ok(created)
    }

    /// Update a record and swap in the backend's copy of it.
    pub async fn edit(
        &mut self,
        id: ResourceId,
        fields: &R::Fields,
    ) -> Result<R::Record, RequestError> {
        let updated = self.client.update(id, fields).await?;
        match self
            .items
            .iter_mut()
            .find(|record| R::id_of(record) == id)
        {
            Some(slot) => *slot = updated.clone(),
            None => self.items.push(updated.clone()),
        }
        Ok(updated)
    }

    /// Delete a record, then refetch; the ack body carries no record to apply.
    ///
    /// The confirmed delete is applied locally first, so a failed refetch
    /// still leaves the record off the shelf.
    pub async fn remove(&mut self, id: ResourceId) -> Result<(), RequestError> {
        self.client.delete(id).await?;
        self.items.retain(|record| R::id_of(record) != id);
        self.refresh().await?;
        Ok(())
    }
}
