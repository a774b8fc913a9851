//! Backend commands queued from the controller to the backend worker.

use catalog_client::LoadTicket;

pub enum BackendCommand {
    LoadCatalog { ticket: LoadTicket },
}
