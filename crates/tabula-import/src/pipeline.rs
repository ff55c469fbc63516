use tabula_model::normalize_workbook;

use crate::{
    AcquireError, AcquiredFile, Acquisition, FileAcquirer, ImportConfig, ImportError,
    ImportOutcome, ImportReport, ImportStateMachine, SPREADSHEET_MIME_TYPES,
};

/// Runs imports one at a time against a single [`ImportStateMachine`].
#[derive(Debug, Default)]
pub struct Importer {
    config: ImportConfig,
    machine: ImportStateMachine,
}

impl Importer {
    pub fn new(config: ImportConfig) -> Self {
        Self::with_machine(config, ImportStateMachine::new())
    }

    pub fn with_machine(config: ImportConfig, machine: ImportStateMachine) -> Self {
        Self { config, machine }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn state_machine(&self) -> &ImportStateMachine {
        &self.machine
    }

    /// Discard the imported data, if any. See [`ImportStateMachine::clear`].
    pub fn clear(&mut self) -> bool {
        self.machine.clear()
    }

    /// Ask `acquirer` for a file and import it.
    ///
    /// Every outcome except [`ImportOutcome::Rejected`] leaves the state
    /// machine out of `Importing`.
    pub async fn run_import<A: FileAcquirer>(&mut self, acquirer: &mut A) -> ImportOutcome {
        if let Err(err) = self.machine.begin() {
            log::warn!("import request rejected: {err}");
            return ImportOutcome::Rejected;
        }

        let result = match self.acquire(acquirer).await {
            Ok(Acquisition::Cancelled) => None,
            Ok(Acquisition::Selected(file)) => Some(self.process(file)),
            Err(err) => Some(Err(ImportError::from(err))),
        };

        let (transition, outcome) = match result {
            None => {
                log::debug!("file selection cancelled");
                (self.machine.cancel(), ImportOutcome::Cancelled)
            }
            Some(Ok(report)) => {
                log::info!(
                    "imported `{}`: {} rows x {} columns",
                    report.file_name,
                    report.row_count,
                    report.column_count
                );
                let transition = self
                    .machine
                    .succeed(report.file_name.clone(), report.data.clone());
                (transition, ImportOutcome::Completed(report))
            }
            Some(Err(err)) => {
                log::warn!("import failed: {err}");
                let message = err.to_string();
                (self.machine.fail(message.clone()), ImportOutcome::Failed(message))
            }
        };

        // `begin` succeeded and `self` is borrowed exclusively, so the machine
        // is still `Importing` here.
        if let Err(err) = transition {
            log::error!("import state machine out of sync: {err}");
        }
        outcome
    }

    async fn acquire<A: FileAcquirer>(&self, acquirer: &mut A) -> Result<Acquisition, AcquireError> {
        let request = acquirer.request(&SPREADSHEET_MIME_TYPES);
        match self.config.acquire_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| AcquireError::Timeout(limit))?,
            None => request.await,
        }
    }

    fn process(&self, file: AcquiredFile) -> Result<ImportReport, ImportError> {
        let file_name = file.display_name();
        let bytes = file.payload.into_bytes(self.config.max_payload_bytes)?;
        log::debug!("acquired `{file_name}` ({} bytes)", bytes.len());

        let workbook = tabula_io::decode(&bytes)?;
        let rows = normalize_workbook(&workbook);
        Ok(ImportReport::build(file_name, rows, self.config.mode))
    }
}
