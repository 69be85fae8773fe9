use crate::processing::SceneReport;

#[derive(Debug)]
pub(crate) struct ProcessingStats {
    pub(crate) total_files: usize,
    pub(crate) processed: usize,
    pub(crate) failed: usize,
    pub(crate) total_triangles: usize,
    pub(crate) total_vertices: usize,
}

impl ProcessingStats {
    pub(crate) fn new(total_files: usize) -> Self {
        Self {
            total_files,
            processed: 0,
            failed: 0,
            total_triangles: 0,
            total_vertices: 0,
        }
    }

    pub(crate) fn record(&mut self, report: &SceneReport) {
        self.processed += 1;
        self.total_triangles += report.triangles;
        self.total_vertices += report.vertices;
    }

    pub(crate) fn print_progress(&self) {
        println!(
            "Progress: {}/{} scenes processed, {} failed, {} triangles generated",
            self.processed + self.failed,
            self.total_files,
            self.failed,
            self.total_triangles
        );
    }

    pub(crate) fn print_summary(&self) {
        println!("\n=== Processing Summary ===");
        println!("Total scenes: {}", self.total_files);
        println!("Successfully processed: {}", self.processed);
        println!("Failed: {}", self.failed);
        println!("Total triangles generated: {}", self.total_triangles);
        println!("Total vertices generated: {}", self.total_vertices);
        println!("Success rate: {:.1}%", self.success_rate());
    }

    pub(crate) fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        (self.processed as f64 / self.total_files as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate() {
        let mut stats = ProcessingStats::new(4);
        stats.record(&SceneReport { triangles: 4, vertices: 12 });
        stats.record(&SceneReport { triangles: 1, vertices: 3 });
        stats.failed += 1;
        assert_eq!(stats.total_triangles, 5);
        assert_eq!(stats.total_vertices, 15);
        assert_eq!(stats.success_rate(), 50.0);
    }

    #[test]
    fn empty_batch_has_zero_success_rate() {
        assert_eq!(ProcessingStats::new(0).success_rate(), 0.0);
    }
}
