#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use revolve_core::{
    ActiveSequence, Geometry, LayoutPlan, TransformTarget, ViewportSurface,
};

/// What the surface was asked to mount in one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MountRecord {
    pub item_width: f64,
    pub group_width: Option<f64>,
    /// One entry per mounted element; each lists the item ids it renders.
    pub elements: Vec<Vec<u32>>,
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub width: f64,
    pub mounts: Vec<MountRecord>,
    /// Geometry handed over by resizes that kept the mounted elements.
    pub resizes: Vec<Geometry>,
    pub slot_transforms: HashMap<usize, f64>,
    pub wrapper_transform: f64,
    pub transform_calls: usize,
}

impl SurfaceLog {
    pub fn mount_count(&self) -> usize {
        self.mounts.len()
    }

    pub fn last_mount(&self) -> Option<&MountRecord> {
        self.mounts.last()
    }
}

/// Viewport stand-in that records everything the engine asks of it.
/// Element handles are the index of the element in the last mount.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new(width: f64) -> (Self, Arc<Mutex<SurfaceLog>>) {
        let log = Arc::new(Mutex::new(SurfaceLog {
            width,
            ..SurfaceLog::default()
        }));
        (
            Self {
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl ViewportSurface for RecordingSurface {
    type Item = u32;
    type Handle = usize;

    fn viewport_width(&self) -> f64 {
        self.log.lock().width
    }

    fn mount(&mut self, plan: &LayoutPlan<'_, u32>) {
        let elements = match plan.sequence {
            ActiveSequence::Items(items) => {
                items.iter().map(|item| vec![*item]).collect()
            }
            ActiveSequence::Pages(pages) => {
                pages.iter().map(|page| page.items.clone()).collect()
            }
        };
        let mut log = self.log.lock();
        log.slot_transforms.clear();
        log.mounts.push(MountRecord {
            item_width: plan.geometry.item_width,
            group_width: plan.geometry.group_width,
            elements,
        });
    }

    fn mounted_elements(&self) -> Vec<usize> {
        let log = self.log.lock();
        let count = log.last_mount().map_or(0, |mount| mount.elements.len());
        (0..count).collect()
    }

    fn apply_geometry(&mut self, geometry: &Geometry) {
        self.log.lock().resizes.push(*geometry);
    }

    fn apply_transform(
        &mut self,
        target: TransformTarget<'_, usize>,
        percent: f64,
    ) {
        let mut log = self.log.lock();
        log.transform_calls += 1;
        match target {
            TransformTarget::Wrapper => log.wrapper_transform = percent,
            TransformTarget::Slot(handle) => {
                log.slot_transforms.insert(*handle, percent);
            }
        }
    }
}

pub fn items(count: u32) -> Vec<u32> {
    (0..count).collect()
}

pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-3
}
