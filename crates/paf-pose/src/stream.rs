use {
    crate::{
        assembler::{PoseAssembler, Poses},
        interop::tensor_from_candle,
        PoseError,
    },
    futures_core::Stream,
    futures_sink::Sink,
    paf_base::Tensor,
    std::{
        collections::VecDeque,
        fmt,
        future::Future,
        pin::Pin,
        sync::Arc,
        task::{Context, Poll, Waker},
    },
};

/// Network output for one frame: part confidence maps and affinity fields.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub confidence: Tensor<f32>,
    pub affinity: Tensor<f32>,
}

impl FrameOutput {
    pub fn new(confidence: Tensor<f32>, affinity: Tensor<f32>) -> Self {
        Self {
            confidence,
            affinity,
        }
    }

    /// Copy both heads of a candle model output to the host.
    pub fn from_candle(
        confidence: &candle_core::Tensor,
        affinity: &candle_core::Tensor,
    ) -> Result<Self, PoseError> {
        Ok(Self {
            confidence: tensor_from_candle(confidence)?,
            affinity: tensor_from_candle(affinity)?,
        })
    }
}

/// Pose assembly over a sequence of frames.
///
/// Implements `Sink<FrameOutput>` to accept network outputs and
/// `Stream<Item = Result<Poses>>` to produce the assembled skeletons.
///
/// Each `FrameOutput` sent via the Sink maps 1:1 to a `Poses` yielded from the
/// Stream, in order. Closing the sink signals no more input; the stream ends
/// once all pending frames are processed.
pub struct PoseStream {
    assembler: Arc<PoseAssembler>,
    pending: VecDeque<FrameOutput>,
    closed: bool,
    inflight: Option<Pin<Box<dyn Future<Output = Result<Poses, PoseError>> + Send>>>,
    stream_waker: Option<Waker>,
}

impl fmt::Debug for PoseStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseStream")
            .field("config", self.assembler.config())
            .field("pending", &self.pending.len())
            .field("closed", &self.closed)
            .field("inflight", &self.inflight.is_some())
            .finish()
    }
}

impl PoseStream {
    pub fn new(assembler: PoseAssembler) -> Self {
        Self {
            assembler: Arc::new(assembler),
            pending: VecDeque::new(),
            closed: false,
            inflight: None,
            stream_waker: None,
        }
    }

    /// Spawn assembly of the given frame as an inflight future.
    fn start_assembly(&mut self, frame: FrameOutput) {
        let assembler = Arc::clone(&self.assembler);

        self.inflight = Some(Box::pin(async move {
            tokio::task::spawn_blocking(move || {
                assembler.assemble(&frame.confidence, &frame.affinity)
            })
            .await
            .map_err(|e| PoseError::Runtime(format!("assembly task failed: {e}")))?
        }));
    }

    fn poll_inflight(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Poses, PoseError>>> {
        match self.inflight.as_mut() {
            Some(fut) => match fut.as_mut().poll(cx) {
                Poll::Ready(result) => {
                    self.inflight = None;
                    Poll::Ready(Some(result))
                }
                Poll::Pending => Poll::Pending,
            },
            None => Poll::Ready(None),
        }
    }
}

impl Sink<FrameOutput> for PoseStream {
    type Error = PoseError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn start_send(self: Pin<&mut Self>, item: FrameOutput) -> Result<(), PoseError> {
        let this = self.get_mut();
        if this.closed {
            return Err(PoseError::Runtime("frame sent after close".to_string()));
        }
        this.pending.push_back(item);
        if let Some(waker) = this.stream_waker.take() {
            waker.wake();
        }
        Ok(())
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), PoseError>> {
        let this = self.get_mut();
        this.closed = true;
        if let Some(waker) = this.stream_waker.take() {
            waker.wake();
        }
        Poll::Ready(Ok(()))
    }
}

impl Stream for PoseStream {
    type Item = Result<Poses, PoseError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if this.inflight.is_some() {
            return this.poll_inflight(cx);
        }

        if let Some(frame) = this.pending.pop_front() {
            this.start_assembly(frame);
            return this.poll_inflight(cx);
        }

        if this.closed {
            return Poll::Ready(None);
        }

        this.stream_waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

fn _assert_send() {
    fn assert<T: Send>() {}
    assert::<PoseStream>();
}
