//! Service node: one server with an optional bounded waiting line
//!
//! A node with capacity `0` is server-only (the single-queue topology keeps
//! its queue at the dispatcher). A node with capacity `Q > 0` lets up to `Q`
//! jobs wait behind the job in service.
//!
//! The node does not run on a clock. It catches up lazily: every admission
//! first [`drains`](ServiceNode::drain) jobs whose departure precedes the
//! arriving job, and the probing dispatch policies drain nodes the same way
//! before comparing them. A node that is rarely touched therefore reports
//! stale statistics; this is part of the model.
//!
//! # Statistics
//!
//! The node keeps running totals only. The derived figures are
//! Little's-law style approximations rather than busy fractions:
//!
//! - `utilization = total_service / last_departure`
//! - `avg_queue_length = total_delay / last_departure`
//!
//! For a node that has processed nothing, [`avg_service_time`],
//! [`avg_delay`] and [`utilization`] return `NaN` and
//! [`avg_queue_length`] returns `0.0`.
//!
//! [`avg_service_time`]: ServiceNode::avg_service_time
//! [`avg_delay`]: ServiceNode::avg_delay
//! [`utilization`]: ServiceNode::utilization
//! [`avg_queue_length`]: ServiceNode::avg_queue_length

use crate::job::Job;
use crate::queue::FifoQueue;
use lbsim_core::logging::events;
use lbsim_core::Seconds;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ServiceNode {
    id: usize,
    /// Waiting jobs in arrival order. The head is the job in service once the
    /// queue has been drained past its predecessor.
    queue: FifoQueue<Job>,
    /// Departure of the job currently occupying the server
    service_departure: Seconds,
    /// Departure of the most recently admitted job
    last_departure: Seconds,
    total_service: Seconds,
    total_delay: Seconds,
    num_processed: u64,
}

impl ServiceNode {
    pub fn new(id: usize, capacity: usize) -> Self {
        Self {
            id,
            queue: FifoQueue::new(capacity),
            service_departure: 0.0,
            last_departure: 0.0,
            total_service: 0.0,
            total_delay: 0.0,
            num_processed: 0,
        }
    }

    /// A node with no waiting line.
    pub fn server_only(id: usize) -> Self {
        Self::new(id, 0)
    }

    /// Evict queued jobs that departed strictly before `now`.
    ///
    /// When jobs remain and either something was evicted or the job in
    /// service has departed by `now`, the head moves into the server. If the
    /// queue empties, the server keeps its previous departure time. Returns
    /// the number of evicted jobs.
    pub fn drain(&mut self, now: Seconds) -> usize {
        let mut evicted = 0;
        while self
            .queue
            .peek()
            .is_some_and(|head| head.departure() < now)
        {
            self.queue.dequeue();
            evicted += 1;
        }

        if evicted > 0 || now > self.service_departure {
            if let Some(head) = self.queue.peek() {
                self.service_departure = head.departure();
            }
        }
        if evicted > 0 {
            events::queue_drained(self.id, now, evicted, self.queue.len());
        }
        evicted
    }

    /// Offer `job` to this node at time `now`.
    ///
    /// The job goes straight into service only when the server is free at its
    /// arrival and nobody is waiting. Otherwise it joins the queue if there is
    /// room, with its delay re-derived from the departure of the job in
    /// service. Admission updates the running totals immediately because an
    /// admitted job is guaranteed service. Rejection leaves the node untouched
    /// apart from draining.
    pub fn admit(&mut self, mut job: Job, now: Seconds) -> bool {
        if self.capacity() > 0 {
            self.drain(now);
        }

        let busy = job.arrival() < self.service_departure || !self.queue.is_empty();
        if busy {
            job.recompute_delay(self.service_departure);
            let admitted = job.clone();
            if self.queue.enqueue(job).is_err() {
                events::job_rejected(self.id, admitted.arrival());
                return false;
            }
            self.record(&admitted);
        } else {
            self.record(&job);
            self.service_departure = job.departure();
        }
        true
    }

    fn record(&mut self, job: &Job) {
        self.num_processed += 1;
        self.total_service += job.service();
        self.total_delay += job.delay();
        self.last_departure = self.last_departure.max(job.departure());
        events::job_admitted(self.id, job.arrival(), job.delay(), job.departure());
    }

    /// Utilization this node would report if `job` were admitted now.
    ///
    /// Does not modify the node.
    pub fn preview_utilization(&self, job: &Job) -> f64 {
        (self.total_service + job.service()) / job.departure()
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum number of waiting jobs; `0` for a server-only node.
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queued_jobs(&self) -> impl Iterator<Item = &Job> {
        self.queue.iter()
    }

    pub fn service_departure(&self) -> Seconds {
        self.service_departure
    }

    pub fn last_departure(&self) -> Seconds {
        self.last_departure
    }

    pub fn total_service(&self) -> Seconds {
        self.total_service
    }

    pub fn total_delay(&self) -> Seconds {
        self.total_delay
    }

    pub fn num_processed(&self) -> u64 {
        self.num_processed
    }

    pub fn avg_service_time(&self) -> f64 {
        if self.num_processed == 0 {
            return f64::NAN;
        }
        self.total_service / self.num_processed as f64
    }

    pub fn utilization(&self) -> f64 {
        if self.num_processed == 0 {
            return f64::NAN;
        }
        self.total_service / self.last_departure
    }

    pub fn avg_queue_length(&self) -> f64 {
        if self.num_processed == 0 {
            return 0.0;
        }
        self.total_delay / self.last_departure
    }

    pub fn avg_delay(&self) -> f64 {
        if self.num_processed == 0 {
            return f64::NAN;
        }
        self.total_delay / self.num_processed as f64
    }
}

impl fmt::Display for ServiceNode {
    /// One console line per node; queue columns only for nodes with a queue.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {:>2}, util: {:>7.5}, njobs: {:>6}, avg_s: {:>6.1}",
            self.id,
            self.utilization(),
            self.num_processed,
            self.avg_service_time()
        )?;
        if self.capacity() > 0 {
            write!(
                f,
                ", avg_q: {:>4.3}, avg_d: {:>6.1}",
                self.avg_queue_length(),
                self.avg_delay()
            )?;
        }
        Ok(())
    }
}
