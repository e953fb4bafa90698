use crate::core::{IndexSearcher, RecordFinder, Storage};
use crate::domain::lookup::LookupTable;
use crate::domain::model::{RunSummary, SearchHit, SearchRequest, SearchTarget};
use crate::utils::error::{FindRecordsError, Result};
use crate::utils::validation::validate_non_empty_string;
use std::io::Write;
use uuid::Uuid;

/// Hits requested from the index per round trip.
pub const PAGE_SIZE: usize = 100;

type FileNamer = Box<dyn Fn() -> String + Send + Sync>;

/// `<32 hex digits>.xml`
pub fn random_record_file_name() -> String {
    format!("{}.xml", Uuid::new_v4().simple())
}

/// Runs the `searching` workflow: resolve selectors, page through the index,
/// and either list bib numbers or pull each record from the SRU into storage.
///
/// Hits are handled as each page arrives; results go to `out`, per-record
/// diagnostics to `err`.
pub struct SearchEngine<S: IndexSearcher, F: RecordFinder, St: Storage> {
    lookups: LookupTable,
    searcher: S,
    finder: F,
    storage: St,
    file_namer: FileNamer,
    page_size: usize,
}

impl<S: IndexSearcher, F: RecordFinder, St: Storage> SearchEngine<S, F, St> {
    pub fn new(searcher: S, finder: F, storage: St) -> Self {
        Self {
            lookups: LookupTable::default(),
            searcher,
            finder,
            storage,
            file_namer: Box::new(random_record_file_name),
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_file_namer(mut self, namer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.file_namer = Box::new(namer);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub async fn run<O: Write, E: Write>(
        &self,
        request: &SearchRequest,
        out: &mut O,
        err: &mut E,
    ) -> Result<RunSummary> {
        let target = self
            .lookups
            .resolve(request.field.as_ref(), request.subfield.as_ref())?;
        validate_non_empty_string("query_term", &request.query_term)?;

        self.log_target(&request.query_term, &target);

        let wanted = request.limit.unwrap_or(usize::MAX);
        let mut summary = RunSummary::default();

        while summary.total_hits < wanted {
            let rows = self.page_size.min(wanted - summary.total_hits);
            let page = self
                .searcher
                .search_page(&request.query_term, &target, summary.total_hits, rows)
                .await?;

            if summary.total_hits == 0 {
                tracing::info!("Index matched {} record(s) for {}", page.num_found, target);
            }
            summary.num_found = page.num_found;

            if page.hits.is_empty() {
                break;
            }

            let remaining = wanted - summary.total_hits;
            for hit in page.hits.iter().take(remaining) {
                summary.total_hits += 1;
                let position = summary.total_hits;
                if request.extract_records {
                    self.extract_hit(position, hit, &mut summary, out, err)
                        .await?;
                } else {
                    Self::list_hit(position, hit, &mut summary, out, err)?;
                }
            }
            out.flush()?;

            if summary.total_hits as u64 >= page.num_found {
                break;
            }
        }

        if (summary.total_hits as u64) < summary.num_found {
            tracing::info!(
                "Processed {} of {} matching records",
                summary.total_hits,
                summary.num_found
            );
        }

        if request.extract_records {
            Self::finish_extraction(&summary, out)?;
        } else {
            Self::finish_listing(&summary, out)?;
        }
        Ok(summary)
    }

    fn log_target(&self, query_term: &str, target: &SearchTarget) {
        let label = match target {
            SearchTarget::Field(tag) | SearchTarget::Subfield(tag, _) => {
                self.lookups.field_by_tag(*tag).map(|f| f.label)
            }
            SearchTarget::AllFields => None,
        };
        match label {
            Some(label) => tracing::info!("Searching {} ({}) for '{}'", target, label, query_term),
            None => tracing::info!("Searching {} for '{}'", target, query_term),
        }
    }

    fn list_hit<O: Write, E: Write>(
        position: usize,
        hit: &SearchHit,
        summary: &mut RunSummary,
        out: &mut O,
        err: &mut E,
    ) -> Result<()> {
        match &hit.bib_number {
            Some(bib_number) => {
                writeln!(out, "Bib number: {}", bib_number)?;
                summary.listed += 1;
            }
            None => {
                Self::report_missing_bib_number(position, err)?;
                summary.missing_bib_numbers += 1;
            }
        }
        Ok(())
    }

    fn finish_listing<O: Write>(summary: &RunSummary, out: &mut O) -> Result<()> {
        if (summary.total_hits as u64) < summary.num_found {
            writeln!(
                out,
                "Total records in search: {} (of {} matches)",
                summary.total_hits, summary.num_found
            )?;
        } else {
            writeln!(out, "Total records in search: {}", summary.total_hits)?;
        }
        Ok(())
    }

    fn finish_extraction<O: Write>(summary: &RunSummary, out: &mut O) -> Result<()> {
        writeln!(
            out,
            "Records written: {} of {} search results",
            summary.records_written, summary.total_hits
        )?;

        if summary.fetch_failures > 0 || summary.collisions > 0 {
            tracing::warn!(
                "{} record(s) could not be fetched, {} file name collision(s)",
                summary.fetch_failures,
                summary.collisions
            );
        }
        Ok(())
    }

    async fn extract_hit<O: Write, E: Write>(
        &self,
        position: usize,
        hit: &SearchHit,
        summary: &mut RunSummary,
        out: &mut O,
        err: &mut E,
    ) -> Result<()> {
        let Some(bib_number) = hit.bib_number.as_deref() else {
            Self::report_missing_bib_number(position, err)?;
            summary.missing_bib_numbers += 1;
            return Ok(());
        };

        let records = match self.finder.find_records(bib_number).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Fetching bib number {} failed: {}", bib_number, e);
                writeln!(
                    err,
                    "could not retrieve bib number {} from the OLE SRU: {}",
                    bib_number, e
                )?;
                summary.fetch_failures += 1;
                return Ok(());
            }
        };

        if records.is_empty() {
            writeln!(err, "{} has no MARC records in the OLE SRU", bib_number)?;
            return Ok(());
        }

        for record in &records {
            let file_name = (self.file_namer)();
            match self
                .storage
                .write_new_file(&file_name, &record.to_document_bytes())
                .await
            {
                Ok(_) => {
                    writeln!(
                        out,
                        "record for MARC bib number {} written to {}",
                        bib_number, file_name
                    )?;
                    summary.records_written += 1;
                }
                Err(FindRecordsError::FileExists { path }) => {
                    tracing::warn!("Refusing to overwrite {}", path.display());
                    writeln!(err, "could not write over existing file {}", file_name)?;
                    summary.collisions += 1;
                }
                Err(e) => return Err(e),
            }
        }

        writeln!(out, "{} has MARC records in the OLE SRU", bib_number)?;
        Ok(())
    }

    fn report_missing_bib_number<E: Write>(position: usize, err: &mut E) -> Result<()> {
        writeln!(err, "record {} did not have a bib number", position)?;
        Ok(())
    }
}
