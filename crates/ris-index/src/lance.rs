//! LanceDB-backed product index.
//!
//! Each catalog item is one row holding its filter columns, the JSON payload
//! and nullable `image`/`text` vectors. Nearest-neighbour queries run in
//! Lance with the filter pushed down as SQL; fusion is done here.

use anyhow::{anyhow, ensure, Result};
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use std::sync::Arc;

use ris_core::config::Dimensions;
use ris_core::filter::Filter;
use ris_core::traits::{Query, QueryRequest, VectorIndex};
use ris_core::types::{Modality, Payload, ScoredResult};

use crate::fusion::reciprocal_rank_fusion;
use crate::predicate::to_sql;
use crate::schema::{build_products_schema, FILTER_COLUMNS, PAYLOAD_COLUMN};
use crate::IndexedItem;

const BATCH_SIZE: usize = 1000;

pub struct LanceIndex {
    uri: String,
    table_name: String,
    dims: Dimensions,
    rrf_k: f64,
}

impl LanceIndex {
    pub fn new(uri: impl Into<String>, table_name: impl Into<String>, dims: Dimensions, rrf_k: f64) -> Self {
        Self { uri: uri.into(), table_name: table_name.into(), dims, rrf_k }
    }

    /// Each call drives its own single-threaded runtime, so callers stay synchronous.
    fn block_on<F: std::future::Future<Output = Result<T>>, T>(&self, fut: F) -> Result<T> {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        rt.block_on(fut)
    }

    async fn connect(&self) -> Result<Connection> { Ok(connect(&self.uri).execute().await?) }

    /// Replace the table contents with `items`.
    pub fn write(&self, items: &[IndexedItem]) -> Result<usize> { self.block_on(self.write_async(items)) }

    pub fn row_count(&self) -> Result<usize> {
        self.block_on(async {
            let db = self.connect().await?;
            Ok(db.open_table(&self.table_name).execute().await?.count_rows(None).await?)
        })
    }

    async fn write_async(&self, items: &[IndexedItem]) -> Result<usize> {
        let db = self.connect().await?;
        if db.table_names().execute().await?.contains(&self.table_name) {
            db.open_table(&self.table_name).execute().await?.delete("true").await?;
        }
        for batch in items.chunks(BATCH_SIZE) {
            let record_batch = self.items_to_record_batch(batch)?;
            let schema = record_batch.schema();
            let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
            if db.table_names().execute().await?.contains(&self.table_name) {
                db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
            } else {
                db.create_table(&self.table_name, reader).execute().await?;
            }
        }
        tracing::info!(table = %self.table_name, rows = items.len(), "lance index written");
        Ok(items.len())
    }

    fn items_to_record_batch(&self, items: &[IndexedItem]) -> Result<RecordBatch> {
        let schema = build_products_schema(self.dims)?;
        let mut columns: Vec<Arc<dyn Array>> = FILTER_COLUMNS
            .iter()
            .map(|name| {
                let values: Vec<Option<String>> = items.iter().map(|item| item.field(name).map(str::to_string)).collect();
                Arc::new(StringArray::from(values)) as Arc<dyn Array>
            })
            .collect();
        let payloads: Vec<String> = items.iter().map(|item| serde_json::Value::Object(item.payload.clone()).to_string()).collect();
        columns.push(Arc::new(StringArray::from(payloads)));
        for (modality, dim) in [(Modality::Image, self.dims.image), (Modality::Text, self.dims.text)] {
            let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(items.len());
            for item in items {
                let v = item.vector(modality);
                if let Some(v) = v {
                    ensure!(v.len() == dim, "{} vector has {} dims, table expects {}", modality, v.len(), dim);
                }
                vectors.push(v.map(|v| v.iter().map(|&x| Some(x)).collect()));
            }
            columns.push(Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                vectors.into_iter(),
                i32::try_from(dim)?,
            )));
        }
        Ok(RecordBatch::try_new(schema, columns)?)
    }

    async fn nearest(&self, db: &Connection, using: Modality, vector: &[f32], filter: &Filter, limit: usize) -> Result<Vec<ScoredResult>> {
        let table = db.open_table(&self.table_name).execute().await?;
        let mut predicate = format!("`{}` IS NOT NULL", using.as_str());
        if let Some(sql) = to_sql(filter, &FILTER_COLUMNS) {
            predicate = format!("({sql}) AND {predicate}");
        }
        tracing::debug!(modality = %using, limit, %predicate, "lance vector search");
        let mut stream = table
            .vector_search(vector.to_vec())?
            .column(using.as_str())
            .distance_type(DistanceType::Cosine)
            .only_if(predicate)
            .limit(limit)
            .execute()
            .await?;
        let mut results = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let payloads = batch
                .column_by_name(PAYLOAD_COLUMN)
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("payload column missing"))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| anyhow!("_distance column missing"))?;
            for i in 0..batch.num_rows() {
                let payload: Payload = serde_json::from_str(payloads.value(i))?;
                results.push(ScoredResult::scored(payload, 1.0 - distances.value(i)));
            }
        }
        // Batches arrive in distance order; keep it stable across batch boundaries.
        results.sort_by(|a, b| b.score.unwrap_or(f32::MIN).total_cmp(&a.score.unwrap_or(f32::MIN)));
        results.truncate(limit);
        Ok(results)
    }

    async fn query_async(&self, request: &QueryRequest) -> Result<Vec<ScoredResult>> {
        let db = self.connect().await?;
        match &request.query {
            Query::Nearest { using, vector } => self.nearest(&db, *using, vector, &request.filter, request.limit).await,
            Query::Fusion(_) => {
                let mut lists = Vec::with_capacity(request.prefetch.len());
                for prefetch in &request.prefetch {
                    lists.push(self.nearest(&db, prefetch.using, &prefetch.vector, &request.filter, prefetch.limit).await?);
                }
                Ok(reciprocal_rank_fusion(lists, self.rrf_k, request.limit))
            }
        }
    }
}

impl VectorIndex for LanceIndex {
    fn query(&self, request: &QueryRequest) -> Result<Vec<ScoredResult>> { self.block_on(self.query_async(request)) }
}
