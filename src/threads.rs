use std::iter::zip;
use std::sync::mpsc;
use std::thread;

use log::debug;

pub trait Split: Sized {
    /// Split into exactly `n` parts, some of which may be empty.
    fn split_to_vec(self, n: usize) -> Vec<Self>;
}

pub trait Join: Sized {
    fn join_vec(parts: Vec<Self>) -> Self;
}

impl<T> Split for Vec<T> {
    fn split_to_vec(mut self, n: usize) -> Vec<Self> {
        let size = self.len() / n;
        let size_xtra = self.len() % n;

        let mut parts: Vec<Vec<T>> = Vec::with_capacity(n);
        // Parts come off the tail, so they are reversed afterwards.
        for i in (0..n).rev() {
            let len = if i < size_xtra { size + 1 } else { size };
            let at = self.len() - len;
            parts.push(self.split_off(at));
        }
        parts.reverse();
        parts
    }
}

impl<T> Join for Vec<T> {
    fn join_vec(parts: Vec<Self>) -> Self {
        let len = parts.iter().map(Vec::len).sum();
        let mut v = Vec::with_capacity(len);
        for mut p in parts {
            v.append(&mut p);
        }
        v
    }
}

pub trait Call<T, U> {
    fn call(&self, arg: T) -> U;
}

impl<F, T, U> Call<T, U> for F
where
    F: Fn(T) -> U,
{
    fn call(&self, arg: T) -> U {
        self(arg)
    }
}

struct Job<T, U> {
    n: usize,
    part: T,
    reply: mpsc::Sender<(usize, U)>,
}

struct Worker<T, U> {
    tx: mpsc::Sender<Job<T, U>>,
}

impl<T, U> Worker<T, U>
where
    T: Send + 'static,
    U: Send + 'static,
{
    fn new<F>(id: usize, f: F) -> Self
    where
        F: Fn(T) -> U + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Job<T, U>>();
        thread::spawn(move || {
            while let Ok(job) = rx.recv() {
                let solved = f(job.part);
                if job.reply.send((job.n, solved)).is_err() {
                    debug!("worker {}: caller went away", id);
                }
            }
            debug!("worker {}: shutting down", id);
        });
        Self { tx }
    }
}

/// Fixed set of threads that each solve one part of a split input.
///
/// Every call gets its own reply channel, so a pool may be shared by
/// concurrent callers. Dropping the pool stops the workers.
pub struct WorkerPool<T, U> {
    workers: Vec<Worker<T, U>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolDisconnected;

impl<T, U> WorkerPool<T, U>
where
    T: Split + Send + 'static,
    U: Join + Send + 'static,
{
    /// Spawn `n` workers, each running a function built by `factory`.
    pub fn with<G, F>(n: usize, factory: G) -> Self
    where
        G: Fn() -> F,
        F: Fn(T) -> U + Send + 'static,
    {
        assert!(n > 0, "no workers");
        let workers = (0..n).map(|id| Worker::new(id, factory())).collect();
        Self { workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn try_call(&self, arg: T) -> Result<U, PoolDisconnected> {
        let n = self.workers.len();
        let (reply, rx) = mpsc::channel();
        for (i, (worker, part)) in zip(&self.workers, arg.split_to_vec(n)).enumerate() {
            let job = Job {
                n: i,
                part,
                reply: reply.clone(),
            };
            worker.tx.send(job).map_err(|_| PoolDisconnected)?;
        }
        drop(reply);

        let mut parts: Vec<Option<U>> = (0..n).map(|_| None).collect();
        for _ in 0..n {
            let (i, solved) = rx.recv().map_err(|_| PoolDisconnected)?;
            parts[i] = Some(solved);
        }
        let parts = parts
            .into_iter()
            .collect::<Option<Vec<U>>>()
            .ok_or(PoolDisconnected)?;
        Ok(U::join_vec(parts))
    }
}

impl<T, U> Call<T, U> for WorkerPool<T, U>
where
    T: Split + Send + 'static,
    U: Join + Send + 'static,
{
    /// Panics if a worker thread has died.
    fn call(&self, arg: T) -> U {
        self.try_call(arg).expect("worker pool disconnected")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_vec_split(length: usize, n: usize) {
        let v: Vec<usize> = (0..length).collect();
        let parts = v.clone().split_to_vec(n);
        assert_eq!(parts.len(), n);
        let sizes: Vec<usize> = parts.iter().map(Vec::len).collect();
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1);
        assert_eq!(Vec::join_vec(parts), v);
    }

    #[test]
    fn test_vec_splits() {
        test_vec_split(1, 1);
        test_vec_split(0, 2);
        test_vec_split(5, 8);
        test_vec_split(8, 5);
        test_vec_split(100, 1);
        test_vec_split(55, 47);
    }

    fn doubling_pool(n: usize) -> WorkerPool<Vec<i64>, Vec<i64>> {
        WorkerPool::with(n, || {
            |v: Vec<i64>| -> Vec<i64> { v.into_iter().map(|x| x * 2).collect() }
        })
    }

    #[test]
    fn test_pool_preserves_order() {
        let pool = doubling_pool(4);
        assert_eq!(pool.size(), 4);
        let input: Vec<i64> = (0..1000).collect();
        let expected: Vec<i64> = input.iter().map(|x| x * 2).collect();
        assert_eq!(pool.call(input), expected);
    }

    #[test]
    fn test_pool_with_more_workers_than_items() {
        let pool = doubling_pool(8);
        assert_eq!(pool.try_call(vec![1, 2, 3]), Ok(vec![2, 4, 6]));
        assert_eq!(pool.try_call(vec![]), Ok(vec![]));
    }

    #[test]
    fn test_pool_matches_plain_function() {
        let f = |v: Vec<u64>| -> Vec<u64> {
            v.into_iter().map(|x| x.wrapping_mul(x) % 7).collect()
        };
        let pool = WorkerPool::with(3, || f);
        let input: Vec<u64> = (0..37).collect();
        assert_eq!(pool.call(input.clone()), f.call(input));
    }

    #[test]
    fn test_pool_shared_between_threads() {
        let pool = std::sync::Arc::new(doubling_pool(2));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let pool = pool.clone();
                thread::spawn(move || {
                    let input: Vec<i64> = (t * 100..t * 100 + 100).collect();
                    let expected: Vec<i64> = input.iter().map(|x| x * 2).collect();
                    assert_eq!(pool.call(input), expected);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
