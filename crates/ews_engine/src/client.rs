//! The store client: one method per remote verb.

use crate::config::ClientConfig;
use crate::error::{ClientResult, TransportError};
use crate::renderer::{Renderer, XmlRenderer};
use crate::transport::Transport;
use ews_model::{Contact, Folder, ModelError};
use ews_props::{PropVariant, TypeRegistry};
use ews_protocol::{
    check_fault, classify_response_messages, parse_response, read_contacts, read_folder,
    read_folders, read_identity, read_items_page, read_sync_delta, FolderRef, ItemRef, ItemUpdate,
    ItemsPage, ProtocolError, Request, SyncCursor, SyncDelta, Traversal,
};
use ews_xml::parse_document;
use tracing::{debug, warn};

/// A synchronous client over one remote store.
///
/// Every method issues exactly one request/response round trip through
/// the transport, except [`StoreClient::find_all_items`] and
/// [`StoreClient::find_items_since`], which page until the server
/// declares the end of range. Sync deliberately does not loop: callers
/// persist the cursor between pages, so a crash mid-sync resumes from
/// the last checkpoint instead of starting over.
///
/// The client is not designed for concurrent mutation of shared
/// entities; parallel callers should work on disjoint entity graphs.
pub struct StoreClient<T: Transport, R: Renderer = XmlRenderer> {
    transport: T,
    renderer: R,
    config: ClientConfig,
    registry: TypeRegistry,
}

impl<T: Transport> StoreClient<T> {
    /// Creates a client with the standard renderer, default
    /// configuration, and the standard property-type registry.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            renderer: XmlRenderer,
            config: ClientConfig::default(),
            registry: TypeRegistry::mapi(),
        }
    }
}

impl<T: Transport, R: Renderer> StoreClient<T, R> {
    /// Creates a client with an explicit renderer.
    pub fn with_renderer(transport: T, renderer: R) -> Self {
        Self {
            transport,
            renderer,
            config: ClientConfig::default(),
            registry: TypeRegistry::mapi(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the property-type registry.
    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// The property-type registry in use.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn execute(&self, request: &Request) -> ClientResult<String> {
        debug!(template = %request.template(), "issuing request");
        let bytes = self.renderer.render(request)?;
        let response = self.transport.send(&bytes)?;
        if response.is_empty() {
            return Err(TransportError::EmptyResponse.into());
        }
        Ok(parse_response(&response)?)
    }

    /// Binds a folder by reference, returning its current state.
    pub fn bind_folder(&self, folder: &FolderRef) -> ClientResult<Folder> {
        let xml = self.execute(&Request::BindFolder {
            folder: folder.clone(),
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        let bound = match outcomes.successes.first() {
            Some((_, node)) => Some(read_folder(*node)?),
            None => None,
        };
        if let Some(err) = outcomes.into_error() {
            return Err(err.into());
        }

        let mut bound =
            bound.ok_or(ProtocolError::UnexpectedResponse("GetFolderResponseMessage"))?;
        if let FolderRef::Distinguished(name) = folder {
            bound.set_well_known_name(name.clone());
        }
        Ok(bound)
    }

    /// Enumerates child folders under a parent.
    ///
    /// When `class_filter` is set, only folders carrying that folder
    /// class are returned; filtering happens client-side because the
    /// enumeration verb has no class restriction.
    pub fn find_folders(
        &self,
        parent: &FolderRef,
        traversal: Traversal,
        class_filter: Option<&str>,
    ) -> ClientResult<Vec<Folder>> {
        let xml = self.execute(&Request::FindFolders {
            parent: parent.clone(),
            traversal,
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        let mut folders = Vec::new();
        for (_, node) in &outcomes.successes {
            folders.extend(read_folders(*node)?);
        }
        if let Some(err) = outcomes.into_error() {
            return Err(err.into());
        }

        if let Some(class) = class_filter {
            folders.retain(|f| f.folder_class() == Some(class));
        }
        Ok(folders)
    }

    /// Fetches one enumeration page at the given offset.
    pub fn find_items_page(
        &self,
        folder: &FolderRef,
        offset: u32,
        since: Option<&str>,
    ) -> ClientResult<ItemsPage> {
        let xml = self.execute(&Request::FindItems {
            folder: folder.clone(),
            offset,
            batch_size: self.config.batch_size,
            since: since.map(str::to_string),
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        let page = match outcomes.successes.first() {
            Some((_, node)) => Some(read_items_page(*node, &self.registry)?),
            None => None,
        };
        if let Some(err) = outcomes.into_error() {
            return Err(err.into());
        }
        page.ok_or_else(|| ProtocolError::UnexpectedResponse("FindItemResponseMessage").into())
    }

    /// Enumerates every item in a folder, paging until the server
    /// declares the end of range.
    pub fn find_all_items(&self, folder: &FolderRef) -> ClientResult<Vec<Contact>> {
        self.enumerate(folder, None)
    }

    /// Enumerates items modified strictly after the given timestamp.
    pub fn find_items_since(
        &self,
        folder: &FolderRef,
        watermark: &str,
    ) -> ClientResult<Vec<Contact>> {
        self.enumerate(folder, Some(watermark))
    }

    fn enumerate(&self, folder: &FolderRef, since: Option<&str>) -> ClientResult<Vec<Contact>> {
        let mut all = Vec::new();
        let mut offset = 0u32;
        let mut known_total: Option<u32> = None;

        loop {
            let page = self.find_items_page(folder, offset, since)?;
            let fetched = page.contacts.len();
            all.extend(page.contacts);

            if let Some(total) = page.total_count {
                known_total = Some(total);
            }
            if page.includes_last {
                break;
            }

            offset += self.config.batch_size;
            // Termination bound for servers that never flag the last
            // page: stop once the offset passes the known total.
            if let Some(total) = known_total {
                if offset >= total {
                    warn!(offset, total, "end-of-range never declared, stopping at total");
                    break;
                }
            }
            if fetched == 0 {
                warn!(offset, "empty page without end-of-range flag, stopping");
                break;
            }
        }

        Ok(all)
    }

    /// Fetches full items by reference.
    pub fn get_items(&self, item_ids: &[ItemRef]) -> ClientResult<Vec<Contact>> {
        let xml = self.execute(&Request::GetItems {
            item_ids: item_ids.to_vec(),
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        let mut contacts = Vec::new();
        for (_, node) in &outcomes.successes {
            contacts.extend(read_contacts(*node, &self.registry)?);
        }
        if let Some(err) = outcomes.into_error() {
            return Err(err.into());
        }
        Ok(contacts)
    }

    /// Creates contacts under a folder, binding server-assigned
    /// identity back into the supplied entities.
    ///
    /// Identity feedback is positional: the server preserves request
    /// order in its response, so success element `i` binds entity `i`.
    /// Entities whose elements failed, or came back as warnings, stay
    /// unbound; the aggregate error is raised after every element has
    /// been walked.
    pub fn create_contacts(
        &self,
        folder: &FolderRef,
        contacts: &mut [Contact],
    ) -> ClientResult<()> {
        if contacts.is_empty() {
            return Ok(());
        }

        let mut items = Vec::with_capacity(contacts.len());
        for contact in contacts.iter() {
            items.push(contact.to_field());
        }
        let xml = self.execute(&Request::CreateItems {
            folder: folder.clone(),
            items,
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        for (index, node) in &outcomes.successes {
            let identity = read_identity(*node)?;
            if let Some(contact) = contacts.get_mut(*index) {
                contact
                    .item_mut()
                    .bind_identity(identity.item_id, identity.change_key);
            }
        }
        match outcomes.into_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Applies each contact's pending update diff, refreshing change
    /// keys from the response.
    ///
    /// Every contact must be bound; a stale change key is surfaced as
    /// the server's element error, never retried locally.
    pub fn update_contacts(&self, contacts: &mut [Contact]) -> ClientResult<()> {
        if contacts.is_empty() {
            return Ok(());
        }

        let mut updates = Vec::with_capacity(contacts.len());
        for contact in contacts.iter() {
            updates.push(self.update_for(contact)?);
        }
        let xml = self.execute(&Request::UpdateItems { updates })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        for (index, node) in &outcomes.successes {
            let identity = read_identity(*node)?;
            if let Some(contact) = contacts.get_mut(*index) {
                contact.item_mut().refresh_change_key(identity.change_key);
            }
        }
        match outcomes.into_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn update_for(&self, contact: &Contact) -> ClientResult<ItemUpdate> {
        let item = contact.item();
        let (Some(item_id), Some(change_key)) = (item.item_id(), item.change_key()) else {
            return Err(ModelError::NotBound.into());
        };

        let mut sets = contact.get_updates().sets;
        for prop in item.extended_properties() {
            // Unclassifiable properties have no usable field locator.
            if !matches!(prop.variant(), PropVariant::Unknown) {
                sets.push(prop.to_field());
            }
        }

        Ok(ItemUpdate {
            item_id: item_id.to_string(),
            change_key: change_key.to_string(),
            sets,
        })
    }

    /// Deletes bound contacts using the configured disposal mode.
    pub fn delete_contacts(&self, contacts: &[Contact]) -> ClientResult<()> {
        let mut item_ids = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let item = contact.item();
            let (Some(id), Some(change_key)) = (item.item_id(), item.change_key()) else {
                return Err(ModelError::NotBound.into());
            };
            item_ids.push(ItemRef::new(id, Some(change_key.to_string())));
        }
        self.delete_items(item_ids)
    }

    /// Deletes items by reference using the configured disposal mode.
    pub fn delete_items(&self, item_ids: Vec<ItemRef>) -> ClientResult<()> {
        if item_ids.is_empty() {
            return Ok(());
        }

        let xml = self.execute(&Request::DeleteItems {
            item_ids,
            delete_type: self.config.delete_type,
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        match outcomes.into_error() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Runs one incremental-sync round trip.
    ///
    /// Pass `None` for a full baseline, or the cursor from the previous
    /// page. When the returned delta's `includes_last` is false, the
    /// caller checkpoints the new cursor and calls again; the engine
    /// never auto-loops here.
    pub fn sync_folder_items(
        &self,
        folder: &FolderRef,
        cursor: Option<&SyncCursor>,
    ) -> ClientResult<SyncDelta> {
        let xml = self.execute(&Request::SyncFolderItems {
            folder: folder.clone(),
            cursor: cursor.cloned(),
            batch_size: self.config.sync_batch_size,
        })?;
        let doc = parse_document(&xml).map_err(ProtocolError::Xml)?;
        check_fault(&doc)?;

        let outcomes = classify_response_messages(&doc)?;
        let delta = match outcomes.successes.first() {
            Some((_, node)) => Some(read_sync_delta(*node, &self.registry)?),
            None => None,
        };
        if let Some(err) = outcomes.into_error() {
            return Err(err.into());
        }
        delta.ok_or_else(|| {
            ProtocolError::UnexpectedResponse("SyncFolderItemsResponseMessage").into()
        })
    }
}
