use std::collections::HashMap;
use std::sync::Arc;

use quarry_catalog::{open_immutable, Catalog};
use quarry_common::CoreError;
use quarry_query::Param;
use rusqlite::types::ToSql;
use rusqlite::Connection;
use tokio::sync::oneshot;

use crate::{ExecutionResult, TimeLimit, Value};

struct Job {
    db_name: String,
    sql: String,
    params: Vec<(String, Param)>,
    reply: oneshot::Sender<Result<ExecutionResult, CoreError>>,
}

/// A bounded pool of worker threads, each owning its own lazily-opened,
/// per-database SQLite connections. Requests are admitted FIFO over an
/// unbounded channel and dispatched to whichever worker picks them up next;
/// a connection is never touched by more than one worker over its lifetime.
pub struct ConnectionPool {
    sender: crossbeam_channel::Sender<Job>,
    handles: Vec<std::thread::JoinHandle<()>>,
}

impl ConnectionPool {
    pub fn new(catalog: Arc<Catalog>, num_workers: usize, time_limit_ms: u64) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let handles = (0..num_workers)
            .map(|worker_id| {
                let receiver = receiver.clone();
                let catalog = Arc::clone(&catalog);
                std::thread::Builder::new()
                    .name(format!("quarry-worker-{worker_id}"))
                    .spawn(move || worker_loop(worker_id, receiver, catalog, time_limit_ms))
                    .expect("failed to spawn connection pool worker")
            })
            .collect();
        ConnectionPool { sender, handles }
    }

    /// Submits `sql` against `db_name` and awaits its result. The statement
    /// itself runs synchronously on a worker thread; this only suspends the
    /// calling task until that worker replies.
    pub async fn execute(
        &self,
        db_name: &str,
        sql: &str,
        params: Vec<(String, Param)>,
    ) -> Result<ExecutionResult, CoreError> {
        let (reply, reply_rx) = oneshot::channel();
        let job = Job {
            db_name: db_name.to_string(),
            sql: sql.to_string(),
            params,
            reply,
        };
        self.sender
            .send(job)
            .map_err(|_| CoreError::ExecutionError("connection pool is shut down".to_string()))?;
        reply_rx
            .await
            .map_err(|_| CoreError::ExecutionError("pool worker dropped the reply".to_string()))?
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        // Dropping `self.sender` (implicit, it's a field) would race with the
        // explicit join below; take the handles out and let each worker's
        // `recv` fail naturally once every sender clone is gone.
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(
    worker_id: usize,
    receiver: crossbeam_channel::Receiver<Job>,
    catalog: Arc<Catalog>,
    time_limit_ms: u64,
) {
    let mut connections: HashMap<String, Connection> = HashMap::new();
    tracing::debug!(worker_id, "pool worker started");
    while let Ok(job) = receiver.recv() {
        let result = execute_job(&mut connections, &catalog, &job, time_limit_ms);
        let _ = job.reply.send(result);
    }
    tracing::debug!(worker_id, "pool worker shutting down");
}

fn execute_job(
    connections: &mut HashMap<String, Connection>,
    catalog: &Catalog,
    job: &Job,
    time_limit_ms: u64,
) -> Result<ExecutionResult, CoreError> {
    let entry = catalog
        .lookup(&job.db_name)
        .ok_or_else(|| CoreError::NotFound(job.db_name.clone()))?;

    let conn = match connections.get(&job.db_name) {
        Some(conn) => conn,
        None => {
            let conn = open_immutable(&entry.file_path)
                .map_err(|e| CoreError::ExecutionError(e.to_string()))?;
            connections.entry(job.db_name.clone()).or_insert(conn)
        }
    };

    run_statement(conn, &job.sql, &job.params, time_limit_ms)
}

fn run_statement(
    conn: &Connection,
    sql: &str,
    params: &[(String, Param)],
    time_limit_ms: u64,
) -> Result<ExecutionResult, CoreError> {
    let _guard = TimeLimit::install(conn, time_limit_ms);

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| CoreError::ExecutionError(e.to_string()))?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let n_cols = columns.len();

    let bound: Vec<(String, rusqlite::types::Value)> = params
        .iter()
        .map(|(name, value)| (format!(":{name}"), to_rusqlite_value(value)))
        .collect();
    let bound_refs: Vec<(&str, &dyn ToSql)> = bound
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect();

    let mut rows_out = Vec::new();
    let mut rows = stmt
        .query(bound_refs.as_slice())
        .map_err(|e| CoreError::ExecutionError(e.to_string()))?;
    while let Some(row) = rows.next().map_err(|e| CoreError::ExecutionError(e.to_string()))? {
        let mut values = Vec::with_capacity(n_cols);
        for i in 0..n_cols {
            let value_ref = row
                .get_ref(i)
                .map_err(|e| CoreError::ExecutionError(e.to_string()))?;
            values.push(Value::from_ref(value_ref));
        }
        rows_out.push(values);
    }

    Ok(ExecutionResult {
        columns,
        rows: rows_out,
    })
}

fn to_rusqlite_value(param: &Param) -> rusqlite::types::Value {
    match param {
        Param::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Param::Integer(n) => rusqlite::types::Value::Integer(*n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_catalog::Inspector;

    fn fixture_catalog() -> (Arc<Catalog>, tempfile::TempPath) {
        let file = tempfile::Builder::new().suffix(".db").tempfile().unwrap();
        {
            let conn = Connection::open(file.path()).unwrap();
            conn.execute_batch(
                "create table widgets (id integer primary key, name text);
                 insert into widgets (name) values ('alpha'), ('beta');",
            )
            .unwrap();
        }
        let path = file.into_temp_path();
        let catalog = Inspector::scan(&[path.to_path_buf()]).unwrap();
        (Arc::new(catalog), path)
    }

    #[tokio::test]
    async fn executes_select_and_returns_rows() {
        let (catalog, path) = fixture_catalog();
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let pool = ConnectionPool::new(catalog, 2, 1000);

        let result = pool
            .execute(&name, "select id, name from widgets order by id", vec![])
            .await
            .unwrap();

        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0][1], Value::Text("alpha".to_string()));
    }

    #[tokio::test]
    async fn binds_named_parameters() {
        let (catalog, path) = fixture_catalog();
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let pool = ConnectionPool::new(catalog, 1, 1000);

        let result = pool
            .execute(
                &name,
                "select name from widgets where name = :p0",
                vec![("p0".to_string(), Param::Text("beta".to_string()))],
            )
            .await
            .unwrap();

        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0][0], Value::Text("beta".to_string()));
    }

    #[tokio::test]
    async fn unknown_database_is_not_found() {
        let (catalog, _path) = fixture_catalog();
        let pool = ConnectionPool::new(catalog, 1, 1000);
        let err = pool.execute("does-not-exist", "select 1", vec![]).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn slow_statement_is_cancelled_by_the_deadline() {
        let (catalog, path) = fixture_catalog();
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let pool = ConnectionPool::new(catalog, 1, 20);

        // A recursive common table expression that spins long enough for the
        // progress handler to have many opportunities to fire before it
        // would otherwise terminate.
        let sql = "with recursive spin(x) as (select 1 union all select x + 1 from spin where x < 100000000) select count(*) from spin";
        let err = pool.execute(&name, sql, vec![]).await.unwrap_err();
        assert!(matches!(err, CoreError::ExecutionError(_)));
    }
}
