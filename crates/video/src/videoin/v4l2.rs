use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat, fourcc_to_string},
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

// number of mmap buffers handed to the driver
const BUFFER_COUNT: u32 = 4;

// the pixel format a v4l fourcc maps to, if the worker can convert it
fn capture_format(fourcc: &FourCC) -> Option<PixelFormat> {
    PixelFormat::from_fourcc(u32::from_le_bytes(fourcc.repr))
}

fn to_fourcc(format: PixelFormat) -> FourCC {
    FourCC::new(&format.as_fourcc().to_le_bytes())
}

pub(crate) struct V4l2 {
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
}

impl V4l2 {
    pub fn new() -> Self {
        Self {
            stream: None,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        self.stream.take();

        let device = match &config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(config.index)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = match config.size {
            Some(size) => size,
            None => Vec2::new(device_format.width as usize, device_format.height as usize),
        };

        // keep the device's own format when we can convert it, YUYV otherwise
        let desired_fourcc =
            to_fourcc(capture_format(&device_format.fourcc).unwrap_or(PixelFormat::Yuyv));

        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = capture_format(&actual_format.fourcc).ok_or_else(|| {
            VideoError::Device(format!(
                "Unsupported pixel format: {}",
                fourcc_to_string(u32::from_le_bytes(actual_format.fourcc.repr))
            ))
        })?;

        if let Some(frame_rate) = config.frame_rate {
            Capture::set_params(
                &device,
                &v4l::video::capture::Parameters::with_fps(frame_rate as u32),
            )?;
        }
        let params = Capture::params(&device)?;
        let frame_rate = params.interval.denominator as f32 / params.interval.numerator.max(1) as f32;

        self.stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
            Ok(stream) => Some(stream),
            Err(error) => {
                return Err(VideoError::Stream(error.to_string()));
            }
        };

        Ok(VideoInConfig {
            index: config.index,
            path: config.path.clone(),
            size: Some(self.size),
            frame_rate: Some(frame_rate),
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(VideoError::Stream("No stream".to_string()));
        };
        let (frame_data, _metadata) =
            CaptureStream::next(stream).map_err(|error| VideoError::Stream(error.to_string()))?;

        // drivers may hand back padded buffers for packed formats
        let data = match self.format.bytes_per_pixel() {
            Some(bpp) => {
                let len = (self.size.area() * bpp).min(frame_data.len());
                frame_data[..len].to_vec()
            }
            None => frame_data.to_vec(),
        };
        Ok(Image::new(self.size, data, self.format))
    }
}
